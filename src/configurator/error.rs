use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfiguratorError {
    #[error("unknown part name `{0}`")]
    UnknownPart(String),

    #[error("invalid hex color `{0}`")]
    InvalidColor(String),

    #[error("model {path} has no sub-mesh named `{mesh}`")]
    MissingSubMesh { path: String, mesh: String },

    #[error("sub-mesh `{mesh}` in {path} has no primitives")]
    EmptySubMesh { path: String, mesh: String },

    #[error("failed to load model {path}: {reason}")]
    AssetLoad { path: String, reason: String },

    #[error("model {path} did not finish loading within {secs} seconds")]
    LoadTimeout { path: String, secs: f32 },
}
