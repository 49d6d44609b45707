//! Core types for tarshard
//!
//! This crate defines the foundational types shared by the writer, the
//! dataset source and the CLI:
//! - Sample: one keyed (payload, label, metadata) unit to be archived
//! - KeyPolicy: how sample keys are derived from the source
//! - Error: the fatal error taxonomy (config, duplicate key, I/O)
//! - Limits: threshold floors and defaults for shard rollover

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod key;
pub mod limits;
pub mod sample;

pub use error::{ConfigError, ShardError, ShardResult};
pub use key::{validate_key, KeyPolicy, INDEX_KEY_WIDTH};
pub use limits::{
    DEFAULT_MAX_BYTES, DEFAULT_MAX_SAMPLES, MAX_SAMPLES_CEILING, MIN_MAX_BYTES_FLOOR,
    SHARD_INDEX_WIDTH,
};
pub use sample::{extensions, Sample, SampleMetadata};
