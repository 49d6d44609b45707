//! Shard and run result types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Suffix of a shard that is still open, or was abandoned by an abort
pub const PARTIAL_SUFFIX: &str = "partial";

/// A sealed shard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardInfo {
    /// Zero-based shard index
    pub index: u64,
    /// Final path of the shard file
    pub path: PathBuf,
    /// Samples in the shard
    pub sample_count: u64,
    /// Tracked entry bytes (headers excluded)
    pub byte_count: u64,
    /// Size of the shard file on disk
    pub file_size: u64,
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Sealed shards in index order
    pub shards: Vec<ShardInfo>,
    /// Samples across all shards
    pub total_samples: u64,
    /// Tracked bytes across all shards
    pub total_bytes: u64,
}

impl RunSummary {
    /// Build a summary from sealed shards.
    pub fn from_shards(shards: Vec<ShardInfo>) -> Self {
        let total_samples = shards.iter().map(|s| s.sample_count).sum();
        let total_bytes = shards.iter().map(|s| s.byte_count).sum();
        Self {
            shards,
            total_samples,
            total_bytes,
        }
    }

    /// Sample count of each shard, in index order.
    pub fn sample_counts(&self) -> Vec<u64> {
        self.shards.iter().map(|s| s.sample_count).collect()
    }
}
