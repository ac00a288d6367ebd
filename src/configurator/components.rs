use bevy::prelude::*;

use super::part::Part;

// ── Scene markers ───────────────────────────────────────────────────

/// Root of the shoe; carries the idle pose.
#[derive(Component)]
pub struct ShoeRoot;

/// One sub-mesh of the shoe, with its own material instance.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartMesh(pub Part);

/// Shadow-catcher plane under the shoe. Not pickable, so presses on it
/// count as presses on empty space.
#[derive(Component)]
pub struct Ground;

// ── App lifecycle ───────────────────────────────────────────────────

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    /// Model requested, not yet resolved.
    #[default]
    Loading,
    Ready,
    /// Load failed or timed out; the UI stays usable without the model.
    Failed,
}
