//! Error types for shard writing
//!
//! Every writer error in this module is fatal to the run that raised it:
//! nothing is retried and nothing is downgraded to a warning. We use
//! `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type for shard operations
pub type ShardResult<T> = std::result::Result<T, ShardError>;

/// Configuration errors, detected eagerly before any shard exists
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Byte threshold at or below the floor
    #[error("max shard size must exceed {floor} bytes, got {max_bytes}")]
    MaxBytesTooSmall {
        /// Configured threshold
        max_bytes: u64,
        /// Exclusive lower bound
        floor: u64,
    },

    /// Sample threshold at or above the ceiling
    #[error("max shard sample count must be below {ceiling}, got {max_samples}")]
    MaxSamplesTooLarge {
        /// Configured threshold
        max_samples: u64,
        /// Exclusive upper bound
        ceiling: u64,
    },

    /// Sample threshold of zero would never admit a sample
    #[error("max shard sample count must be at least 1")]
    MaxSamplesZero,

    /// Shard path pattern is unusable
    #[error("invalid shard pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as given
        pattern: String,
        /// What is wrong with it
        reason: String,
    },

    /// A required directory does not exist
    #[error("{0}: not a directory")]
    MissingDirectory(String),

    /// The shard destination cannot be written
    #[error("{0}: should be a writable destination directory for shards")]
    NotWritable(String),

    /// Split list is empty or malformed
    #[error("invalid split list: {0}")]
    InvalidSplits(String),

    /// A numeric or file setting could not be parsed
    #[error("invalid setting: {0}")]
    Parse(String),
}

/// Errors raised while writing or reading shards
#[derive(Debug, Error)]
pub enum ShardError {
    /// Rejected configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A key repeated within one run
    #[error("duplicate sample key '{key}'")]
    DuplicateKey {
        /// The repeated key
        key: String,
    },

    /// A key that cannot name tar entries unambiguously
    #[error("invalid sample key '{key}': {reason}")]
    InvalidKey {
        /// The offending key
        key: String,
        /// Why it was rejected
        reason: String,
    },

    /// Filesystem failure while writing or sealing a shard
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Metadata serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tar container failure
    #[error("archive error: {0}")]
    Archive(String),

    /// The run already failed and accepts no more samples
    #[error("shard writer aborted by an earlier error")]
    Aborted,

    /// The run was closed and accepts no more samples
    #[error("shard writer is already closed")]
    Closed,

    /// A stored sample lacks one of its entries
    #[error("sample '{key}' in shard is missing its .{extension} entry")]
    MissingEntry {
        /// Sample key
        key: String,
        /// Missing entry extension
        extension: String,
    },
}

impl ShardError {
    /// Create an archive error
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
