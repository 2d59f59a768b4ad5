//! Error types for layout generation

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Graph algorithm errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Longest path search needs a graph without undirected cycles
    #[error("graph contains a cycle; longest path is only defined on forests")]
    Cyclic,
}

/// Errors produced by a generator run
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no rooms to generate")]
    NoRooms,

    #[error("grid {width}x{height} is too small for rooms of size {needed}")]
    GridTooSmall { width: i32, height: i32, needed: i32 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;
