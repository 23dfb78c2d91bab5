// src/errors.rs

//! Crate-wide error types.

use std::path::PathBuf;

use thiserror::Error;

/// A single input file could not be transformed by one of the collaborators
/// (style compiler, template renderer, minifier, prefixer).
///
/// This is the only error kind the fault barrier is allowed to swallow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{tool} failed on {path:?}: {message}")]
pub struct TransformError {
    pub tool: String,
    pub path: PathBuf,
    pub message: String,
}

impl TransformError {
    pub fn new(tool: impl Into<String>, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("Shared build failed: {0}")]
    DelegateFailed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AssetError {
    /// True when this error came from a collaborator rejecting an input file.
    pub fn is_transform(&self) -> bool {
        matches!(self, AssetError::Transform(_))
    }
}

pub type Result<T> = std::result::Result<T, AssetError>;
