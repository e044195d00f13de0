//! Error types for the core library

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The stored collection exists but could not be parsed.
    #[error("Stored task collection under '{key}' is corrupt: {reason}")]
    CorruptCollection { key: String, reason: String },

    #[error("Failed to import media into {path}: {source}")]
    MediaIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Create a MediaIo error for the given destination
    pub fn media_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::MediaIo {
            path: path.into(),
            source,
        }
    }

    /// True for failures of the storage layer or of (de)serializing the collection
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_)
                | Self::CorruptCollection { .. }
                | Self::Io(_)
                | Self::Serialization(_)
        )
    }
}
