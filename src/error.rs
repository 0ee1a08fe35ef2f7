//! Error types for reelstate
//!
//! All modules use `ReelResult<T>` as their return type. Store load and
//! persist failures are built as errors internally but only ever logged.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for reelstate operations
pub type ReelResult<T> = Result<T, ReelError>;

/// All errors that can occur in reelstate
#[derive(Error, Debug)]
pub enum ReelError {
    // Cursor errors
    #[error("Batch '{label}' has no items to iterate")]
    EmptySequence { label: String },

    #[error("Index {index} is out of range for a batch of {total} items")]
    IndexOutOfRange { index: usize, total: usize },

    // Cache errors
    #[error("Invalid fingerprint '{0}': expected 16 lowercase hex characters")]
    InvalidFingerprint(String),

    // Store errors
    #[error("Store file {path} is corrupt: {reason}")]
    StoreLoadCorrupt { path: PathBuf, reason: String },

    #[error("Failed to write store file {path}: {source}")]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Batch errors
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl ReelError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::EmptySequence { .. } => {
                Some("Check that the directory holds files matching the pattern")
            }
            Self::IndexOutOfRange { .. } => Some("Run: reelstate batch peek <label>"),
            Self::ConfigInvalid { .. } => Some("Run: reelstate config init --force"),
            Self::InvalidPattern { .. } => Some("Patterns use glob syntax, e.g. *.png or **/*.mp4"),
            _ => None,
        }
    }
}
