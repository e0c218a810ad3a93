//! Error types for graph building and chain loading.

use rackgraph_config::ConfigError;
use thiserror::Error;

/// A descriptor tree that cannot be compiled into a graph.
///
/// Every variant carries the path of the offending node: `/` is the root,
/// `/1/0` the first child of the second top-level descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The `type` names no registered effect
    #[error("unknown effect type '{type_name}' at {path}")]
    UnknownType {
        /// Type name as written.
        type_name: String,
        /// Location of the descriptor.
        path: String,
    },

    /// A non-group node without a `type`
    #[error("'{tag}' node at {path} is neither a group nor has a type")]
    MissingType {
        /// Tag of the node.
        tag: String,
        /// Location of the node.
        path: String,
    },

    /// An invalid group shape
    #[error("invalid group at {path}: {reason}")]
    Structural {
        /// Location of the group.
        path: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl BuildError {
    /// Create an unknown type error.
    pub fn unknown_type(type_name: impl Into<String>, path: impl Into<String>) -> Self {
        BuildError::UnknownType {
            type_name: type_name.into(),
            path: path.into(),
        }
    }

    /// Create a missing type error.
    pub fn missing_type(tag: impl Into<String>, path: impl Into<String>) -> Self {
        BuildError::MissingType {
            tag: tag.into(),
            path: path.into(),
        }
    }

    /// Create a structural error.
    pub fn structural(path: impl Into<String>, reason: impl Into<String>) -> Self {
        BuildError::Structural {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Path of the node the error refers to.
    pub fn path(&self) -> &str {
        match self {
            BuildError::UnknownType { path, .. }
            | BuildError::MissingType { path, .. }
            | BuildError::Structural { path, .. } => path,
        }
    }
}

/// Why a `load_from*` call was rejected.
///
/// A rejected load never touches the live graph.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The text could not be parsed; the builder never ran
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] ConfigError),

    /// The tree could not be compiled
    #[error("failed to build graph: {0}")]
    Build(#[from] BuildError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn unknown_type_display() {
        let err = BuildError::unknown_type("Flanger", "/2");
        assert_eq!(err.to_string(), "unknown effect type 'Flanger' at /2");
        assert_eq!(err.path(), "/2");
    }

    #[test]
    fn missing_type_display() {
        let err = BuildError::missing_type("Effect", "/0/1");
        assert_eq!(
            err.to_string(),
            "'Effect' node at /0/1 is neither a group nor has a type"
        );
    }

    #[test]
    fn structural_display() {
        let err = BuildError::structural("/1", "unknown group mode 'diagonal'");
        assert_eq!(
            err.to_string(),
            "invalid group at /1: unknown group mode 'diagonal'"
        );
    }

    #[test]
    fn load_error_wraps_source() {
        let err: LoadError = BuildError::unknown_type("Flanger", "/0").into();
        assert!(matches!(err, LoadError::Build(_)));
        assert!(err.to_string().contains("Flanger"));
        assert!(err.source().is_some());

        let err: LoadError = ConfigError::invalid_root("empty").into();
        assert!(matches!(err, LoadError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse configuration"));
    }
}
