use bevy::asset::{LoadState, RecursiveDependencyLoadState};
use bevy::gltf::Gltf;
use bevy::prelude::*;

use crate::configurator::error::ConfiguratorError;

/// Handle to the shoe model and the bookkeeping of its one-time load.
#[derive(Resource, Debug)]
pub struct ShoeAssets {
    pub path: String,
    pub gltf: Handle<Gltf>,
    /// Elapsed app time when the load was requested.
    pub requested_at: f32,
    pub error: Option<ConfiguratorError>,
}

impl ShoeAssets {
    pub fn new(path: impl Into<String>, gltf: Handle<Gltf>, requested_at: f32) -> Self {
        Self {
            path: path.into(),
            gltf,
            requested_at,
            error: None,
        }
    }

    /// `Some(error)` once more than `timeout_secs` have passed since the request.
    pub fn check_timeout(&self, now: f32, timeout_secs: f32) -> Option<ConfiguratorError> {
        (now - self.requested_at > timeout_secs).then(|| ConfiguratorError::LoadTimeout {
            path: self.path.clone(),
            secs: timeout_secs,
        })
    }
}

/// Where the model load stands.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelLoad {
    Pending,
    Ready,
    Failed(String),
}

/// Folds the root and recursive load states into one answer. A texture that
/// fails after the `.glb` itself loaded only shows up in `dependencies`.
pub fn model_load_status(root: &LoadState, dependencies: &RecursiveDependencyLoadState) -> ModelLoad {
    match (root, dependencies) {
        (LoadState::Failed(err), _) | (_, RecursiveDependencyLoadState::Failed(err)) => {
            ModelLoad::Failed(err.to_string())
        }
        (LoadState::Loaded, RecursiveDependencyLoadState::Loaded) => ModelLoad::Ready,
        _ => ModelLoad::Pending,
    }
}
