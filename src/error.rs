//! Error types

use std::path::PathBuf;

use thiserror::Error;

/// Invalid input to the bounding volume hierarchy builder
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BvhError {
    #[error("cannot build a bounding volume hierarchy from an empty object list")]
    EmptyList,

    #[error("object {index} has no bounding box to place in a bounding volume hierarchy")]
    MissingBoundingBox { index: usize },
}

/// Errors that can occur while assembling a scene
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to load texture image {}", path.display())]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Bvh(#[from] BvhError),

    #[error("scene has nothing to render")]
    Empty,

    #[error("object {index}: {reason}")]
    InvalidObject { index: usize, reason: String },
}

/// Errors reading or validating a render configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors writing the rendered image
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}
