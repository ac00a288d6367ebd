use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfiguratorError;

/// One of the eight customizable regions of the shoe model.
///
/// The declaration order is the order of the sub-meshes in the model
/// (`part_0` .. `part_7`) and the order of the item list rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Part {
    Laces,
    Mesh,
    Caps,
    Inner,
    Sole,
    Stripes,
    Band,
    Patch,
}

impl Part {
    pub const COUNT: usize = 8;

    pub const ALL: [Part; Self::COUNT] = [
        Part::Laces,
        Part::Mesh,
        Part::Caps,
        Part::Inner,
        Part::Sole,
        Part::Stripes,
        Part::Band,
        Part::Patch,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Part::Laces => "laces",
            Part::Mesh => "mesh",
            Part::Caps => "caps",
            Part::Inner => "inner",
            Part::Sole => "sole",
            Part::Stripes => "stripes",
            Part::Band => "band",
            Part::Patch => "patch",
        }
    }

    /// Upper-cased name shown in the header.
    pub fn label(self) -> String {
        self.name().to_uppercase()
    }

    /// Name of the sub-mesh carrying this part in the model file.
    pub fn mesh_name(self) -> String {
        format!("part_{}", self.index())
    }

    pub fn from_mesh_name(name: &str) -> Option<Part> {
        let index: usize = name.strip_prefix("part_")?.parse().ok()?;
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Part {
    type Err = ConfiguratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfiguratorError::UnknownPart(s.to_string()))
    }
}
