//! Custom error types for the gcide-reader crate.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum GcideError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The source file exists but carries no text at all.
    #[error("Source file is empty: {}", path.display())]
    EmptyFile { path: PathBuf },

    /// A single block could not be read as structured text.
    ///
    /// Carries the raw block so the caller can log what was skipped.
    #[error("Malformed block: {reason}")]
    MalformedBlock { reason: String, block: String },

    /// The persistence sink refused an entry.
    #[error("Sink rejected entry: {0}")]
    Sink(String),

    /// An entry could not be serialized for output.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The requested text encoding label is not known to `encoding_rs`.
    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),
}

impl GcideError {
    pub(crate) fn malformed(reason: impl Into<String>, block: &str) -> Self {
        GcideError::MalformedBlock {
            reason: reason.into(),
            block: block.to_string(),
        }
    }

    /// Whether this error is contained at the block level.
    pub fn is_block_level(&self) -> bool {
        matches!(self, GcideError::MalformedBlock { .. })
    }
}

/// A convenience `Result` type alias using the crate's `GcideError` type.
pub type Result<T> = std::result::Result<T, GcideError>;
