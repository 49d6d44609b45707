//! Shard index files
//!
//! A run's sealed shards are listed in a JSON index stored next to them,
//! in the `wids-shard-index-v1` layout streaming loaders read. Each entry
//! also carries an xxh3 checksum of the shard file so a copied shard set
//! can be verified without unpacking it.

use crate::types::RunSummary;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tarshard_core::{ShardError, ShardResult};
use tracing::{debug, warn};
use xxhash_rust::xxh3::Xxh3;

/// Index kind marker
pub const SHARD_INDEX_KIND: &str = "wids-shard-index-v1";

/// Index layout version
pub const SHARD_INDEX_VERSION: u32 = 1;

/// Checksum algorithm recorded in the index
pub const CHECKSUM_ALGORITHM: &str = "xxh3";

/// One shard listed in an index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardIndexEntry {
    /// Shard file name, relative to the index file
    pub url: String,
    /// Samples in the shard
    pub nsamples: u64,
    /// Shard file size in bytes
    pub filesize: u64,
    /// Tracked entry bytes
    pub nbytes: u64,
    /// Hex checksum of the shard file
    pub checksum: String,
}

/// Index of every shard sealed by one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardIndex {
    /// Always [`SHARD_INDEX_KIND`]
    #[serde(rename = "__kind__")]
    pub kind: String,
    /// Always [`SHARD_INDEX_VERSION`]
    pub wids_version: u32,
    /// Dataset name, e.g. `imagenet-train`
    pub name: String,
    /// Checksum algorithm used for `checksum` fields
    pub checksum_algorithm: String,
    /// Shards in index order
    pub shardlist: Vec<ShardIndexEntry>,
}

/// Outcome of checking shards against an index
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexVerifyInfo {
    /// Shards checked
    pub shards: usize,
    /// Samples listed across all shards
    pub samples: u64,
    /// Shards whose size or checksum does not match
    pub mismatched: Vec<String>,
}

impl IndexVerifyInfo {
    /// True when every shard matched.
    pub fn is_valid(&self) -> bool {
        self.mismatched.is_empty()
    }
}

impl ShardIndex {
    /// Build an index for the shards of a finished run.
    pub fn from_summary(name: impl Into<String>, summary: &RunSummary) -> ShardResult<Self> {
        let mut shardlist = Vec::with_capacity(summary.shards.len());
        for shard in &summary.shards {
            shardlist.push(ShardIndexEntry {
                url: file_name(&shard.path)?,
                nsamples: shard.sample_count,
                filesize: shard.file_size,
                nbytes: shard.byte_count,
                checksum: file_xxh3_hex(&shard.path)?,
            });
        }
        Ok(Self {
            kind: SHARD_INDEX_KIND.to_string(),
            wids_version: SHARD_INDEX_VERSION,
            name: name.into(),
            checksum_algorithm: CHECKSUM_ALGORITHM.to_string(),
            shardlist,
        })
    }

    /// Total samples across all shards.
    pub fn total_samples(&self) -> u64 {
        self.shardlist.iter().map(|s| s.nsamples).sum()
    }

    /// Write the index atomically (temp file, then rename).
    pub fn write(&self, path: &Path) -> ShardResult<()> {
        let json = serde_json::to_vec_pretty(self)?;
        let temp_path = path.with_extension("tmp");

        if let Err(e) = fs::write(&temp_path, &json) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        fs::rename(&temp_path, path)?;
        debug!(target: "tarshard::index", path = %path.display(), shards = self.shardlist.len(), "Wrote shard index");
        Ok(())
    }

    /// Read and parse an index file.
    pub fn read(path: &Path) -> ShardResult<Self> {
        let data = fs::read(path)?;
        let index: ShardIndex = serde_json::from_slice(&data)?;
        if index.kind != SHARD_INDEX_KIND {
            return Err(ShardError::archive(format!(
                "{}: unsupported index kind '{}'",
                path.display(),
                index.kind
            )));
        }
        Ok(index)
    }

    /// Check every listed shard under `base_dir` against its size and checksum.
    pub fn verify(&self, base_dir: &Path) -> ShardResult<IndexVerifyInfo> {
        let mut info = IndexVerifyInfo {
            shards: self.shardlist.len(),
            samples: self.total_samples(),
            mismatched: Vec::new(),
        };

        for (entry, path) in self.shardlist.iter().zip(self.shard_paths(base_dir)) {
            let size = match fs::metadata(&path) {
                Ok(meta) => meta.len(),
                Err(e) => {
                    warn!(target: "tarshard::index", path = %path.display(), error = %e, "Indexed shard missing");
                    info.mismatched.push(entry.url.clone());
                    continue;
                }
            };
            if size != entry.filesize || file_xxh3_hex(&path)? != entry.checksum {
                warn!(target: "tarshard::index", path = %path.display(), "Shard does not match index");
                info.mismatched.push(entry.url.clone());
            }
        }
        Ok(info)
    }

    /// Paths of all listed shards under `base_dir`.
    pub fn shard_paths(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.shardlist.iter().map(|s| base_dir.join(&s.url)).collect()
    }
}

fn file_name(path: &Path) -> ShardResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| ShardError::archive(format!("{}: no UTF-8 file name", path.display())))
}

/// Hex-encoded xxh3 checksum of a file, read in chunks.
pub fn file_xxh3_hex(path: &Path) -> ShardResult<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Xxh3::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:016x}", hasher.digest()))
}
