//! Conversion and verification drivers.

use crate::config::CliConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tarshard::{
    convert_split, write_split_index, ConfigError, ConvertOptions, ImageFolder, ShardIndex,
    ShardPattern, ShardReader,
};
use tracing::info;

/// Everything checked before the first shard is created.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Splits to convert, in order
    pub splits: Vec<String>,
    /// Per-split conversion settings
    pub options: ConvertOptions,
    /// Dataset root
    pub data: PathBuf,
    /// Shard destination
    pub shards: PathBuf,
    /// Shard file name prefix
    pub prefix: String,
}

/// Outcome of one converted split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReport {
    /// Split name
    pub split: String,
    /// Samples written
    pub samples: u64,
    /// Shards sealed
    pub shards: usize,
    /// Index file written next to the shards
    pub index: PathBuf,
}

/// Validate settings and the filesystem layout.
pub fn check_preconditions(config: &CliConfig) -> Result<Plan, ConfigError> {
    let shard_config = config.shard_config()?;
    let splits = config.split_names()?;

    let train = config.data.join("train");
    if !train.is_dir() {
        return Err(ConfigError::MissingDirectory(train.display().to_string()));
    }
    for split in &splits {
        let dir = config.data.join(split);
        if !dir.is_dir() {
            return Err(ConfigError::MissingDirectory(dir.display().to_string()));
        }
    }
    if !is_writable_dir(&config.shards) {
        return Err(ConfigError::NotWritable(
            config.shards.display().to_string(),
        ));
    }

    Ok(Plan {
        splits,
        options: ConvertOptions {
            key_policy: config.key_policy(),
            seed: config.seed,
            shard_config,
        },
        data: config.data.clone(),
        shards: config.shards.clone(),
        prefix: config.prefix.clone(),
    })
}

/// Convert every planned split, stopping at the first failure.
pub fn run_convert(plan: &Plan) -> Result<Vec<SplitReport>, String> {
    let mut reports = Vec::with_capacity(plan.splits.len());
    for split in &plan.splits {
        info!(target: "tarshard::cli", split = %split, "Starting split");
        let folder = ImageFolder::open(&plan.data, split).map_err(|e| e.to_string())?;
        let pattern =
            ShardPattern::for_split(&plan.shards, &plan.prefix, split).map_err(|e| e.to_string())?;
        let summary = convert_split(&folder, pattern, &plan.options)
            .map_err(|e| format!("split '{}': {}", split, e))?;
        let index = write_split_index(&plan.shards, &plan.prefix, split, &summary)
            .map_err(|e| format!("split '{}': {}", split, e))?;

        reports.push(SplitReport {
            split: split.clone(),
            samples: summary.total_samples,
            shards: summary.shards.len(),
            index,
        });
    }
    Ok(reports)
}

/// Check shard files and index files, returning one line per path.
pub fn run_verify(paths: &[PathBuf]) -> Result<Vec<String>, String> {
    let mut lines = Vec::with_capacity(paths.len());
    for path in paths {
        let is_index = path.extension().and_then(|e| e.to_str()) == Some("json");
        if is_index {
            let index = ShardIndex::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            let info = index
                .verify(base)
                .map_err(|e| format!("{}: {}", path.display(), e))?;
            if !info.is_valid() {
                return Err(format!(
                    "{}: {} shard(s) failed verification: {}",
                    path.display(),
                    info.mismatched.len(),
                    info.mismatched.join(", ")
                ));
            }
            lines.push(format!(
                "{}\t{} shards\t{} samples",
                path.display(),
                info.shards,
                info.samples
            ));
        } else {
            let contents =
                ShardReader::validate(path).map_err(|e| format!("{}: {}", path.display(), e))?;
            lines.push(format!("{}\t{}", path.display(), contents.sample_count));
        }
    }
    Ok(lines)
}

fn is_writable_dir(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    let probe = dir.join(format!(".makeshards-probe-{}", std::process::id()));
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&probe)
    {
        Ok(_) => fs::remove_file(&probe).is_ok(),
        Err(_) => false,
    }
}
