// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StageTreeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("flow graph has no root node (no node with an empty parent list)")]
    MissingRoot,

    #[error("node '{node_id}' references unknown parent '{parent_id}'")]
    DanglingParent { node_id: String, parent_id: String },

    #[error("end marker '{node_id}' closes a scope that was never opened")]
    UnbalancedStructuralMarker { node_id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, StageTreeError>;
