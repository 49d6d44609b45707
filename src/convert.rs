//! Split conversion
//!
//! Drives one run: enumerate a split, visit it in shuffled order, turn
//! every entry into a sample and hand it to a [`ShardWriter`]. Shuffling is
//! what keeps shards from being dominated by a single class, so the
//! writer sees samples in exactly the shuffled order.
//!
//! Source file stems must be unique within a split whatever the key
//! policy: a repeated stem means the dataset is aliased, and the run fails
//! with [`ShardError::DuplicateKey`] even when keys are running indices.

use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use tarshard_archive::{RunSummary, ShardConfig, ShardIndex, ShardPattern, ShardWriter};
use tarshard_core::{KeyPolicy, Sample, SampleMetadata, ShardError};
use tarshard_dataset::{probe_dimensions, shuffled_indices, DatasetError, SampleSource};
use thiserror::Error;
use tracing::{debug, info};

/// Default shard name prefix
pub const DEFAULT_PREFIX: &str = "imagenet";

/// Errors from converting a split
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Writer failure (config, duplicate key, I/O)
    #[error(transparent)]
    Shard(#[from] ShardError),

    /// Source failure (enumeration, read, decode)
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Result type for conversions
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Settings for one split conversion
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// How sample keys are derived
    pub key_policy: KeyPolicy,
    /// Shuffle seed; `None` draws a fresh order
    pub seed: Option<u64>,
    /// Rollover thresholds
    pub shard_config: ShardConfig,
}

/// Write every entry of `source` into shards named by `pattern`.
pub fn convert_split<S: SampleSource>(
    source: &S,
    pattern: ShardPattern,
    options: &ConvertOptions,
) -> ConvertResult<RunSummary> {
    source.verify_labels()?;
    info!(target: "tarshard::convert", split = source.split(), nimages = source.len(), pattern = %pattern, "Converting split");

    let mut writer = ShardWriter::with_config(pattern, options.shard_config.clone())?;
    let mut stems: FxHashSet<String> = FxHashSet::default();
    for index in shuffled_indices(source.len(), options.seed) {
        if let Some(entry) = source.entry(index) {
            let stem = file_stem(&entry.path);
            if !stems.insert(stem.clone()) {
                return Err(ShardError::DuplicateKey { key: stem }.into());
            }
        }
        let sample = build_sample(source, index, options.key_policy)?;
        writer.write(&sample)?;
    }
    let summary = writer.finish()?;

    info!(
        target: "tarshard::convert",
        split = source.split(),
        shards = summary.shards.len(),
        samples = summary.total_samples,
        bytes = summary.total_bytes,
        "Split converted"
    );
    Ok(summary)
}

/// Build the sample for the entry at `index`.
pub fn build_sample<S: SampleSource>(
    source: &S,
    index: usize,
    key_policy: KeyPolicy,
) -> ConvertResult<Sample> {
    let entry = source.entry(index).ok_or_else(|| {
        ShardError::archive(format!(
            "entry {} out of range for split '{}'",
            index,
            source.split()
        ))
    })?;
    let payload = source.read(entry)?;
    let dimensions = probe_dimensions(&payload).map_err(|e| match e {
        DatasetError::Decode { reason, .. } => {
            DatasetError::decode(entry.path.display().to_string(), reason)
        }
        other => other,
    })?;
    let key = key_policy.derive(&entry.path, index)?;
    debug!(target: "tarshard::convert", key = %key, path = %entry.path.display(), label = entry.label, "Built sample");

    Ok(Sample::new(
        key,
        payload,
        entry.label,
        SampleMetadata::from_dimensions(dimensions),
    ))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Index file path for a split: `<dir>/<prefix>-<split>-index.json`.
pub fn index_path(dir: &Path, prefix: &str, split: &str) -> PathBuf {
    dir.join(format!("{}-{}-index.json", prefix, split))
}

/// Write the JSON index for a finished split next to its shards.
pub fn write_split_index(
    dir: &Path,
    prefix: &str,
    split: &str,
    summary: &RunSummary,
) -> ConvertResult<PathBuf> {
    let index = ShardIndex::from_summary(format!("{}-{}", prefix, split), summary)?;
    let path = index_path(dir, prefix, split);
    index.write(&path)?;
    Ok(path)
}
