// src/error.rs

//! Error types for quarry

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building an index
#[derive(Error, Debug)]
pub enum Error {
    /// Filename is empty, unsafe, or cannot yield a package name
    #[error("Invalid filename '{filename}': {reason}")]
    InvalidFilename { filename: String, reason: String },

    /// A package record is structurally broken (bad JSON line, bad hash shape)
    #[error("Malformed package record: {reason}")]
    MalformedRecord { reason: String },

    /// I/O error while reading a package list or writing the output tree
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build an `InvalidFilename` error
    pub fn invalid_filename(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidFilename {
            filename: filename.into(),
            reason: reason.into(),
        }
    }

    /// Build a `MalformedRecord` error
    pub fn malformed_record(reason: impl Into<String>) -> Self {
        Error::MalformedRecord {
            reason: reason.into(),
        }
    }
}
