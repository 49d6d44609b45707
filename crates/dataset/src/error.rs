//! Error types for dataset enumeration and probing.

use std::io;
use thiserror::Error;

/// Result type for dataset operations
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;

/// Errors raised while enumerating or reading a dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Split directory does not exist
    #[error("{0}: split directory not found")]
    SplitNotFound(String),

    /// A class directory name is not valid UTF-8
    #[error("{0}: class directory name is not valid UTF-8")]
    NonUtf8Class(String),

    /// Split contains no images
    #[error("{0}: split contains no images")]
    EmptySplit(String),

    /// An entry's label does not match its class directory
    #[error("label {label} of {path} does not match its class directory")]
    LabelMismatch {
        /// Entry path
        path: String,
        /// Recorded label
        label: u32,
    },

    /// An entry's label is outside the class table
    #[error("label {label} of {path} is outside {classes} classes")]
    LabelOutOfRange {
        /// Entry path
        path: String,
        /// Recorded label
        label: u32,
        /// Number of classes
        classes: usize,
    },

    /// Reading a file failed
    #[error("failed to read {path}: {source}")]
    Read {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Image headers could not be decoded
    #[error("failed to decode image {path}: {reason}")]
    Decode {
        /// File path, or a placeholder for in-memory data
        path: String,
        /// Decoder message
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl DatasetError {
    /// Create a read error for `path`
    pub fn read(path: &std::path::Path, source: io::Error) -> Self {
        Self::Read {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create a decode error
    pub fn decode(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
