//! Error types for configuration parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while turning configuration text into a tree.
///
/// None of these ever reach the graph builder: a text that fails to parse
/// is rejected before any node is constructed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed YAML
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed JSON
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed XML
    #[error("failed to parse XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Malformed TOML
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Well-formed text whose top level is not a chain
    #[error("invalid root: {0}")]
    InvalidRoot(String),

    /// A descriptor that cannot be lowered into a tree node
    #[error("invalid descriptor at {path}: {reason}")]
    InvalidDescriptor {
        /// Location of the descriptor, e.g. `/1/bands/0`.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// File extension that maps to no known format
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid root error.
    pub fn invalid_root(reason: impl Into<String>) -> Self {
        ConfigError::InvalidRoot(reason.into())
    }

    /// Create an invalid descriptor error.
    pub fn invalid_descriptor(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidDescriptor {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
