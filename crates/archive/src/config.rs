//! Shard writer configuration.

use tarshard_core::limits::{
    DEFAULT_MAX_BYTES, DEFAULT_MAX_SAMPLES, MAX_SAMPLES_CEILING, MIN_MAX_BYTES_FLOOR,
};
use tarshard_core::ConfigError;

/// Rollover thresholds for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardConfig {
    /// Maximum tracked bytes per shard (default: 1GB).
    ///
    /// A shard holding at least one sample is sealed before a sample that
    /// would push it past this size is written.
    pub max_bytes: u64,

    /// Maximum samples per shard (default: 100000).
    pub max_samples: u64,

    /// Index of the first shard (default: 0).
    pub start_index: u64,
}

impl Default for ShardConfig {
    fn default() -> Self {
        ShardConfig {
            max_bytes: DEFAULT_MAX_BYTES,
            max_samples: DEFAULT_MAX_SAMPLES,
            start_index: 0,
        }
    }
}

impl ShardConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the byte threshold (builder pattern).
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Set the sample threshold (builder pattern).
    pub fn with_max_samples(mut self, max_samples: u64) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Set the first shard index (builder pattern).
    pub fn with_start_index(mut self, start_index: u64) -> Self {
        self.start_index = start_index;
        self
    }

    /// Validate thresholds against the floors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes <= MIN_MAX_BYTES_FLOOR {
            return Err(ConfigError::MaxBytesTooSmall {
                max_bytes: self.max_bytes,
                floor: MIN_MAX_BYTES_FLOOR,
            });
        }
        if self.max_samples >= MAX_SAMPLES_CEILING {
            return Err(ConfigError::MaxSamplesTooLarge {
                max_samples: self.max_samples,
                ceiling: MAX_SAMPLES_CEILING,
            });
        }
        if self.max_samples == 0 {
            return Err(ConfigError::MaxSamplesZero);
        }
        Ok(())
    }
}
