//! Shard path templates
//!
//! A pattern is a path with exactly one printf-style integer placeholder,
//! `%d` or `%0Nd`; `%%` stands for a literal percent sign. Rendering
//! substitutes the shard index, zero-padded to `N` digits:
//!
//! ```text
//! shards/imagenet-train-%06d.tar  ->  shards/imagenet-train-000000.tar
//!                                     shards/imagenet-train-000001.tar
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use tarshard_core::limits::SHARD_INDEX_WIDTH;
use tarshard_core::ConfigError;

/// Parsed shard path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardPattern {
    template: String,
    prefix: String,
    suffix: String,
    width: usize,
}

impl ShardPattern {
    /// Parse a template, rejecting anything but exactly one placeholder.
    pub fn parse(template: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidPattern {
            pattern: template.to_string(),
            reason: reason.to_string(),
        };

        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut width = None;
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            let out = if width.is_none() {
                &mut prefix
            } else {
                &mut suffix
            };
            if c != '%' {
                out.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                out.push('%');
                continue;
            }

            let mut digits = String::new();
            while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                digits.push(d);
                chars.next();
            }
            if chars.next() != Some('d') {
                return Err(invalid("only %d and %0Nd placeholders are supported"));
            }
            if width.is_some() {
                return Err(invalid("more than one index placeholder"));
            }
            let parsed = match digits.as_str() {
                "" | "0" => 0,
                d if d.starts_with('0') => d[1..]
                    .parse::<usize>()
                    .map_err(|_| invalid("bad placeholder width"))?,
                _ => return Err(invalid("only zero padding is supported")),
            };
            width = Some(parsed);
        }

        let width = width.ok_or_else(|| invalid("no index placeholder"))?;
        Ok(Self {
            template: template.to_string(),
            prefix,
            suffix,
            width,
        })
    }

    /// The conventional pattern `<dir>/<prefix>-<split>-%06d.tar`.
    pub fn for_split(dir: &Path, prefix: &str, split: &str) -> Result<Self, ConfigError> {
        if split.is_empty() || split.contains(['/', '\\', '%']) {
            return Err(ConfigError::InvalidSplits(format!(
                "split name '{}' cannot be used in a file name",
                split
            )));
        }
        let name = format!("{}-{}-%0{}d.tar", prefix, split, SHARD_INDEX_WIDTH);
        let path = dir.join(name);
        let template = path.to_str().ok_or_else(|| ConfigError::InvalidPattern {
            pattern: path.display().to_string(),
            reason: "path is not valid UTF-8".to_string(),
        })?;
        Self::parse(template)
    }

    /// Path of the shard with the given index.
    pub fn render(&self, index: u64) -> PathBuf {
        PathBuf::from(format!(
            "{}{:0width$}{}",
            self.prefix,
            index,
            self.suffix,
            width = self.width
        ))
    }

    /// Zero-padding width of the placeholder.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The template as given.
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl fmt::Display for ShardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}
