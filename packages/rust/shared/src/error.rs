//! Error types for postfeed.
//!
//! Library crates use [`PostfeedError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all postfeed operations.
#[derive(Debug, thiserror::Error)]
pub enum PostfeedError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Connection, TLS or body-read failure talking to the document service.
    #[error("network error: {0}")]
    Network(String),

    /// The document service answered with an error object.
    #[error("api error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// A required property was missing or had an unexpected shape.
    #[error("extraction error on {object_id}, `{property}`: {kind}")]
    Extraction {
        object_id: String,
        property: String,
        kind: ExtractionKind,
    },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Caller-supplied input rejected before any request was made.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Why narrowing a response field failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionKind {
    #[error("property is missing")]
    Missing,

    #[error("property has no values")]
    Empty,

    #[error("expected a `{expected}` property, found `{found}`")]
    WrongType { expected: String, found: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PostfeedError>;

impl PostfeedError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create an extraction error for `property` on the object `object_id`.
    pub fn extraction(
        object_id: impl Into<String>,
        property: impl Into<String>,
        kind: ExtractionKind,
    ) -> Self {
        Self::Extraction {
            object_id: object_id.into(),
            property: property.into(),
            kind,
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures raised by the transport or the remote service.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Api { .. })
    }
}
