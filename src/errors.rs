//! Error types for the core layers.

use thiserror::Error;

/// Errors raised while loading term tables or compiling patterns.
#[derive(Debug, Error)]
pub enum FloraError {
    /// A term table exists but could not be read or parsed.
    #[error("failed to load term table {path}: {message}")]
    TermTable { path: String, message: String },

    /// A term table has no keyword column.
    #[error("term table {path} has no `keyword` or `pattern` column")]
    MissingKeywordColumn { path: String },

    /// A pattern refers to a decoder key that was never declared.
    #[error("pattern `{pattern}`: unknown decoder key `{key}`")]
    UnknownDecoderKey { pattern: String, key: String },

    /// A pattern compiled to zero steps.
    #[error("pattern `{pattern}` is empty")]
    EmptyPattern { pattern: String },
}

/// Result type for core operations.
pub type FloraResult<T> = Result<T, FloraError>;
