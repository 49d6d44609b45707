//! Shard reader
//!
//! Reads sealed shards back as samples. Entries are grouped by key, the
//! part of the entry name before the first `.`; consecutive entries with
//! the same key form one sample, and every sample must carry all three
//! of its entries.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tar::Archive;
use tarshard_core::{extensions, Sample, SampleMetadata, ShardError, ShardResult};

/// Summary of one shard's contents
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShardContents {
    /// Number of samples
    pub sample_count: u64,
    /// Number of tar entries
    pub entry_count: u64,
    /// Entry payload bytes, matching the writer's accounting
    pub byte_count: u64,
}

/// Entries collected for the sample being assembled
#[derive(Default)]
struct PendingSample {
    key: String,
    image: Option<Vec<u8>>,
    class: Option<Vec<u8>>,
    metadata: Option<Vec<u8>>,
}

impl PendingSample {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    fn insert(&mut self, extension: &str, data: Vec<u8>) -> ShardResult<()> {
        let slot = match extension {
            extensions::IMAGE => &mut self.image,
            extensions::CLASS => &mut self.class,
            extensions::METADATA => &mut self.metadata,
            other => {
                return Err(ShardError::archive(format!(
                    "unexpected entry '{}.{}'",
                    self.key, other
                )))
            }
        };
        if slot.is_some() {
            return Err(ShardError::archive(format!(
                "entry '{}.{}' appears twice",
                self.key, extension
            )));
        }
        *slot = Some(data);
        Ok(())
    }

    fn into_sample(self) -> ShardResult<Sample> {
        let PendingSample {
            key,
            image,
            class,
            metadata,
        } = self;
        let missing = |extension: &str| ShardError::MissingEntry {
            key: key.clone(),
            extension: extension.to_string(),
        };
        let payload = image.ok_or_else(|| missing(extensions::IMAGE))?;
        let class = class.ok_or_else(|| missing(extensions::CLASS))?;
        let metadata = metadata.ok_or_else(|| missing(extensions::METADATA))?;

        let label = std::str::from_utf8(&class)
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .ok_or_else(|| {
                ShardError::archive(format!("sample '{}' has a non-numeric label", key))
            })?;
        let metadata: SampleMetadata = serde_json::from_slice(&metadata)?;

        Ok(Sample::new(key, payload, label, metadata))
    }
}

/// Reader for shard archives
pub struct ShardReader;

impl ShardReader {
    /// Call `visit` for every sample in archive order.
    pub fn for_each_sample<F>(path: &Path, mut visit: F) -> ShardResult<ShardContents>
    where
        F: FnMut(Sample) -> ShardResult<()>,
    {
        let file = File::open(path)?;
        let mut archive = Archive::new(BufReader::new(file));
        let mut contents = ShardContents::default();
        let mut pending: Option<PendingSample> = None;

        for entry in archive.entries()? {
            let mut entry = entry?;
            let name = entry.path()?.to_string_lossy().to_string();
            let (key, extension) = name.split_once('.').ok_or_else(|| {
                ShardError::archive(format!("entry '{}' has no extension", name))
            })?;

            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            contents.entry_count += 1;
            contents.byte_count += data.len() as u64;

            if pending.as_ref().map_or(true, |p| p.key != key) {
                if let Some(done) = pending.take() {
                    visit(done.into_sample()?)?;
                    contents.sample_count += 1;
                }
                pending = Some(PendingSample::new(key));
            }
            if let Some(p) = pending.as_mut() {
                p.insert(extension, data)?;
            }
        }

        if let Some(done) = pending.take() {
            visit(done.into_sample()?)?;
            contents.sample_count += 1;
        }
        Ok(contents)
    }

    /// Read every sample of a shard into memory.
    pub fn read_samples(path: &Path) -> ShardResult<Vec<Sample>> {
        let mut samples = Vec::new();
        Self::for_each_sample(path, |sample| {
            samples.push(sample);
            Ok(())
        })?;
        Ok(samples)
    }

    /// Validate a shard and count its contents.
    pub fn validate(path: &Path) -> ShardResult<ShardContents> {
        Self::for_each_sample(path, |_| Ok(()))
    }

    /// Keys in archive order.
    pub fn read_keys(path: &Path) -> ShardResult<Vec<String>> {
        let mut keys = Vec::new();
        Self::for_each_sample(path, |sample| {
            keys.push(sample.key);
            Ok(())
        })?;
        Ok(keys)
    }
}
