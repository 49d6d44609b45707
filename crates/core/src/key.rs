//! Sample key derivation
//!
//! A key names every tar entry of its sample (`<key>.jpg`, `<key>.cls`,
//! `<key>.json`). Readers split entry names at the first `.`, so a key may
//! not contain one; it may not contain `/` either, since that would nest
//! entries in directories.

use crate::error::{ShardError, ShardResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Zero-padding width of index-derived keys.
pub const INDEX_KEY_WIDTH: usize = 7;

/// How sample keys are derived from source entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    /// Source file name without its extension
    FileStem,
    /// Position in the source enumeration, zero-padded to 7 digits
    #[default]
    Index,
}

impl KeyPolicy {
    /// Select a policy from the `--filekey` flag.
    pub fn from_filekey(filekey: bool) -> Self {
        if filekey {
            KeyPolicy::FileStem
        } else {
            KeyPolicy::Index
        }
    }

    /// Derive the key for the entry at `index` backed by `file`.
    pub fn derive(&self, file: &Path, index: usize) -> ShardResult<String> {
        let key = match self {
            KeyPolicy::FileStem => file_stem_key(file)?,
            KeyPolicy::Index => format!("{:0width$}", index, width = INDEX_KEY_WIDTH),
        };
        validate_key(&key)?;
        Ok(key)
    }
}

fn file_stem_key(file: &Path) -> ShardResult<String> {
    let stem = file
        .file_stem()
        .ok_or_else(|| ShardError::invalid_key(file.display().to_string(), "no file name"))?;
    stem.to_str()
        .map(str::to_string)
        .ok_or_else(|| ShardError::invalid_key(file.display().to_string(), "file name is not UTF-8"))
}

/// Check that `key` can name tar entries unambiguously.
pub fn validate_key(key: &str) -> ShardResult<()> {
    if key.is_empty() {
        return Err(ShardError::invalid_key(key, "key is empty"));
    }
    if key.contains('.') {
        return Err(ShardError::invalid_key(key, "key contains '.'"));
    }
    if key.contains('/') {
        return Err(ShardError::invalid_key(key, "key contains '/'"));
    }
    Ok(())
}
