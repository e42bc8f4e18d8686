//! Error types for the dispersal plugin.

use layered_flora::FloraError;
use thiserror::Error;

/// Errors raised while configuring or running the extraction pipeline.
///
/// Unrecognized keywords and malformed bag values are not errors; they are
/// logged and skipped where they occur.
#[derive(Debug, Error)]
pub enum DispersalError {
    /// A configuration value is out of range.
    #[error("invalid configuration {path}: {message}")]
    Config { path: String, message: String },

    /// Term table or pattern failure from the core layers.
    #[error(transparent)]
    Core(#[from] FloraError),

    #[error("i/o failure at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {name}: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type for plugin operations.
pub type DispersalResult<T> = Result<T, DispersalError>;
