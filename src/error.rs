//! Crate error types.
//!
//! Per-file fatal conditions only. Recoverable per-line problems are reported as
//! [`crate::formats::Warning`]s, and "not this format" is an empty result.

use std::path::PathBuf;

use thiserror::Error;

/// Crate result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types with enough context to tie a failure to the file that caused it
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<PathBuf>,
    },

    /// Text-format parse failure
    #[error("Parse error in {file:?}: {message}")]
    Parse {
        /// File that failed to parse, if known.
        file: Option<PathBuf>,
        /// Description of the parse failure.
        message: String,
    },

    /// Malformed XML for one of the XML dialects
    #[error("XML error in {file:?}: {message}")]
    Xml {
        /// File that failed to parse, if known.
        file: Option<PathBuf>,
        /// Description of the XML failure, including the byte position.
        message: String,
    },

    /// Archive container error
    #[error("Archive error: {0}")]
    Archive(String),

    /// Input exceeds the configured size limit
    #[error("{path:?} is {size} bytes, limit is {limit}")]
    TooLarge {
        /// File that was rejected, if known.
        path: Option<PathBuf>,
        /// Actual size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// Operation the format does not support (export of a read-only dialect)
    #[error("{format} does not support {operation}")]
    Unsupported {
        /// Human-readable format name.
        format: &'static str,
        /// The rejected operation.
        operation: &'static str,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a parse error with file context
    pub fn parse(message: impl Into<String>, file: impl Into<Option<PathBuf>>) -> Self {
        Self::Parse { file: file.into(), message: message.into() }
    }

    /// Create an XML error without file context
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml { file: None, message: message.into() }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create an unsupported-operation error
    pub const fn unsupported(format: &'static str, operation: &'static str) -> Self {
        Self::Unsupported { format, operation }
    }

    /// Attach a file path to errors that carry one and don't have it yet
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match self {
            Self::Io { source, path: None } => Self::Io { source, path: Some(path) },
            Self::Parse { file: None, message } => Self::Parse { file: Some(path), message },
            Self::Xml { file: None, message } => Self::Xml { file: Some(path), message },
            Self::TooLarge { path: None, size, limit } => Self::TooLarge { path: Some(path), size, limit },
            other => other,
        }
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse { file: None, message: format!("invalid JSON: {e}") }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Archive(e.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Msg(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Msg(s.to_string())
    }
}
