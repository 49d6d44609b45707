//! Run settings for `makeshards`
//!
//! Settings come from three layers: built-in defaults, an optional TOML
//! file (`--config`), then explicit flags.
//!
//! # Example
//!
//! ```toml
//! splits = "train,val"
//! filekey = false
//! maxsize = 1e9
//! maxcount = 100000
//! shards = "./shards"
//! data = "./data"
//! # seed = 42
//! ```

use clap::ArgMatches;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tarshard::{
    ConfigError, KeyPolicy, ShardConfig, DEFAULT_MAX_BYTES, DEFAULT_MAX_SAMPLES, DEFAULT_PREFIX,
    MAX_SAMPLES_CEILING, MIN_MAX_BYTES_FLOOR,
};

/// Settings for one `makeshards` invocation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Comma-separated split names
    pub splits: String,
    /// Use file stems as keys
    pub filekey: bool,
    /// Byte threshold per shard
    pub maxsize: f64,
    /// Sample threshold per shard
    pub maxcount: f64,
    /// Destination directory
    pub shards: PathBuf,
    /// Dataset root
    pub data: PathBuf,
    /// Shard file name prefix
    pub prefix: String,
    /// Shuffle seed
    pub seed: Option<u64>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            splits: "train,val".to_string(),
            filekey: false,
            maxsize: DEFAULT_MAX_BYTES as f64,
            maxcount: DEFAULT_MAX_SAMPLES as f64,
            shards: PathBuf::from("./shards"),
            data: PathBuf::from("./data"),
            prefix: DEFAULT_PREFIX.to_string(),
            seed: None,
        }
    }
}

impl CliConfig {
    /// Read and parse settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Parse(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse(msg) => ConfigError::Parse(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                msg
            )),
            other => other,
        })
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Defaults, overlaid with `--config` when given, overlaid with flags.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let mut config = match matches.get_one::<String>("config") {
            Some(path) => Self::from_file(Path::new(path))?,
            None => Self::default(),
        };
        config.apply_matches(matches);
        Ok(config)
    }

    /// Override fields with explicitly given flags.
    pub fn apply_matches(&mut self, matches: &ArgMatches) {
        if let Some(splits) = matches.get_one::<String>("splits") {
            self.splits = splits.clone();
        }
        if matches.get_flag("filekey") {
            self.filekey = true;
        }
        if let Some(maxsize) = matches.get_one::<f64>("maxsize") {
            self.maxsize = *maxsize;
        }
        if let Some(maxcount) = matches.get_one::<f64>("maxcount") {
            self.maxcount = *maxcount;
        }
        if let Some(shards) = matches.get_one::<String>("shards") {
            self.shards = PathBuf::from(shards);
        }
        if let Some(data) = matches.get_one::<String>("data") {
            self.data = PathBuf::from(data);
        }
        if let Some(prefix) = matches.get_one::<String>("prefix") {
            self.prefix = prefix.clone();
        }
        if let Some(seed) = matches.get_one::<u64>("seed") {
            self.seed = Some(*seed);
        }
    }

    /// Split names in the order given.
    pub fn split_names(&self) -> Result<Vec<String>, ConfigError> {
        let names: Vec<String> = self
            .splits
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Err(ConfigError::InvalidSplits(format!("'{}'", self.splits)));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(ConfigError::InvalidSplits(format!(
                    "split '{}' listed twice",
                    name
                )));
            }
        }
        Ok(names)
    }

    /// Key derivation selected by `filekey`.
    pub fn key_policy(&self) -> KeyPolicy {
        KeyPolicy::from_filekey(self.filekey)
    }

    /// Shard thresholds as integers.
    ///
    /// A shard rolls over once its sample count reaches `maxcount`, so a
    /// fractional count rounds up; a byte total must exceed `maxsize`, so a
    /// fractional size rounds down.
    pub fn shard_config(&self) -> Result<ShardConfig, ConfigError> {
        if !self.maxsize.is_finite() || !self.maxcount.is_finite() {
            return Err(ConfigError::Parse(format!(
                "maxsize and maxcount must be finite, got {} and {}",
                self.maxsize, self.maxcount
            )));
        }
        if self.maxsize <= MIN_MAX_BYTES_FLOOR as f64 {
            return Err(ConfigError::MaxBytesTooSmall {
                max_bytes: self.maxsize.max(0.0) as u64,
                floor: MIN_MAX_BYTES_FLOOR,
            });
        }
        if self.maxcount >= MAX_SAMPLES_CEILING as f64 {
            return Err(ConfigError::MaxSamplesTooLarge {
                max_samples: self.maxcount as u64,
                ceiling: MAX_SAMPLES_CEILING,
            });
        }

        let config = ShardConfig::new()
            .with_max_bytes(self.maxsize.floor() as u64)
            .with_max_samples(self.maxcount.max(0.0).ceil() as u64);
        config.validate()?;
        Ok(config)
    }
}
