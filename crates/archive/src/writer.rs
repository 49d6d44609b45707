//! Sharded archive writer
//!
//! A `ShardWriter` is one run: it accepts samples in order and partitions
//! them into numbered tar shards, rolling over whenever the open shard's
//! budget says the next sample does not fit.
//!
//! # Shard lifecycle
//!
//! Shards are created lazily on the first write, so a run that never sees
//! a sample leaves no file behind. The open shard is written to
//! `<path>.partial`; sealing finishes the tar stream, fsyncs, and renames
//! it to its final path. A sealed shard is never reopened, and at most one
//! shard file is open at any time.
//!
//! # Failure
//!
//! Duplicate or malformed keys and I/O failures abort the run. The open
//! shard is cut back to its last complete sample, finished and flushed so
//! its samples stay inspectable, but it keeps its `.partial` name and never
//! counts as sealed. Every later `write` returns [`ShardError::Aborted`].

use crate::budget::ShardBudget;
use crate::config::ShardConfig;
use crate::entry::EncodedSample;
use crate::pattern::ShardPattern;
use crate::types::{RunSummary, ShardInfo, PARTIAL_SUFFIX};
use rustc_hash::FxHashSet;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tar::Builder;
use tarshard_core::{validate_key, Sample, ShardError, ShardResult};
use tracing::{debug, info, warn};

/// Lifecycle state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// Accepting samples
    Active,
    /// Final shard sealed; no more samples
    Closed,
    /// Failed; no more samples, nothing further sealed
    Aborted,
}

/// The shard currently accepting samples
struct OpenShard {
    index: u64,
    path: PathBuf,
    partial_path: PathBuf,
    builder: Builder<BufWriter<File>>,
    budget: ShardBudget,
    /// File offset just past the last complete sample
    committed: u64,
}

/// Writer for one run of shards.
pub struct ShardWriter {
    pattern: ShardPattern,
    config: ShardConfig,
    /// Every key accepted so far in this run
    keys: FxHashSet<String>,
    current: Option<OpenShard>,
    next_index: u64,
    sealed: Vec<ShardInfo>,
    total_samples: u64,
    total_bytes: u64,
    state: WriterState,
}

impl ShardWriter {
    /// Start a run writing to `pattern` with the given thresholds.
    ///
    /// Validates the thresholds; no file is created until the first write.
    pub fn open(pattern: &str, max_bytes: u64, max_samples: u64) -> ShardResult<Self> {
        let pattern = ShardPattern::parse(pattern)?;
        let config = ShardConfig::new()
            .with_max_bytes(max_bytes)
            .with_max_samples(max_samples);
        Self::with_config(pattern, config)
    }

    /// Start a run from a parsed pattern and a full configuration.
    pub fn with_config(pattern: ShardPattern, config: ShardConfig) -> ShardResult<Self> {
        config.validate()?;
        debug!(
            target: "tarshard::writer",
            pattern = %pattern,
            max_bytes = config.max_bytes,
            max_samples = config.max_samples,
            "Opened shard writer"
        );
        Ok(Self {
            next_index: config.start_index,
            pattern,
            config,
            keys: FxHashSet::default(),
            current: None,
            sealed: Vec::new(),
            total_samples: 0,
            total_bytes: 0,
            state: WriterState::Active,
        })
    }

    /// Append a sample, rolling over to a new shard first if needed.
    ///
    /// After this returns the sample is buffered; it is durable once its
    /// shard is sealed. Any error aborts the run.
    pub fn write(&mut self, sample: &Sample) -> ShardResult<()> {
        match self.state {
            WriterState::Active => {}
            WriterState::Closed => return Err(ShardError::Closed),
            WriterState::Aborted => return Err(ShardError::Aborted),
        }

        let result = self.write_inner(sample);
        if let Err(ref e) = result {
            self.abort(e);
        }
        result
    }

    fn write_inner(&mut self, sample: &Sample) -> ShardResult<()> {
        validate_key(&sample.key)?;
        if !self.keys.insert(sample.key.clone()) {
            return Err(ShardError::DuplicateKey {
                key: sample.key.clone(),
            });
        }

        let encoded = EncodedSample::new(sample)?;
        let entry_bytes = encoded.byte_count();

        let shard = match self.current.take() {
            Some(shard) if shard.budget.needs_rollover(entry_bytes) => {
                self.seal(shard)?;
                self.open_shard()?
            }
            Some(shard) => shard,
            None => self.open_shard()?,
        };
        let shard = self.current.insert(shard);

        encoded.append_to(&mut shard.builder)?;
        shard.committed = shard.builder.get_mut().stream_position()?;
        shard.budget.admit(entry_bytes);
        self.total_samples += 1;
        self.total_bytes += entry_bytes;
        Ok(())
    }

    /// Seal the open shard, if any. Calling again is a no-op.
    pub fn close(&mut self) -> ShardResult<()> {
        if self.state != WriterState::Active {
            return Ok(());
        }

        if let Some(shard) = self.current.take() {
            if let Err(e) = self.seal(shard) {
                self.abort(&e);
                return Err(e);
            }
        }

        self.state = WriterState::Closed;
        info!(
            target: "tarshard::writer",
            shards = self.sealed.len(),
            samples = self.total_samples,
            bytes = self.total_bytes,
            "Closed shard writer"
        );
        Ok(())
    }

    /// Close the run and report what was sealed.
    pub fn finish(mut self) -> ShardResult<RunSummary> {
        self.close()?;
        if self.state == WriterState::Aborted {
            return Err(ShardError::Aborted);
        }
        Ok(RunSummary::from_shards(std::mem::take(&mut self.sealed)))
    }

    fn open_shard(&mut self) -> ShardResult<OpenShard> {
        let index = self.next_index;
        self.next_index += 1;

        let path = self.pattern.render(index);
        let partial_path = partial_path(&path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&partial_path)?;
        info!(target: "tarshard::writer", shard = index, path = %path.display(), "Opened shard");

        Ok(OpenShard {
            index,
            path,
            partial_path,
            builder: Builder::new(BufWriter::new(file)),
            budget: ShardBudget::new(self.config.max_bytes, self.config.max_samples),
            committed: 0,
        })
    }

    fn seal(&mut self, shard: OpenShard) -> ShardResult<()> {
        let OpenShard {
            index,
            path,
            partial_path,
            builder,
            budget,
            ..
        } = shard;

        finish_file(builder)?;
        fs::rename(&partial_path, &path)?;
        let file_size = fs::metadata(&path)?.len();

        if budget.is_oversized() {
            warn!(
                target: "tarshard::writer",
                shard = index,
                bytes = budget.byte_count(),
                max_bytes = self.config.max_bytes,
                "Single sample exceeds max shard size"
            );
        }
        info!(
            target: "tarshard::writer",
            shard = index,
            path = %path.display(),
            samples = budget.sample_count(),
            bytes = budget.byte_count(),
            total = self.total_samples,
            "Sealed shard"
        );

        self.sealed.push(ShardInfo {
            index,
            path,
            sample_count: budget.sample_count(),
            byte_count: budget.byte_count(),
            file_size,
        });
        Ok(())
    }

    /// Stop the run, flushing the open shard under its partial name.
    fn abort(&mut self, cause: &dyn fmt::Display) {
        self.state = WriterState::Aborted;
        let Some(shard) = self.current.take() else {
            warn!(target: "tarshard::writer", error = %cause, "Shard writer aborted");
            return;
        };

        if let Err(e) = finish_partial(shard.builder, shard.committed) {
            warn!(
                target: "tarshard::writer",
                path = %shard.partial_path.display(),
                error = %e,
                "Failed to flush partial shard"
            );
        }
        warn!(
            target: "tarshard::writer",
            shard = shard.index,
            path = %shard.partial_path.display(),
            samples = shard.budget.sample_count(),
            error = %cause,
            "Shard writer aborted, partial shard kept for inspection"
        );
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Shards sealed so far, in index order.
    pub fn sealed_shards(&self) -> &[ShardInfo] {
        &self.sealed
    }

    /// Index of the open shard, if one is open.
    pub fn open_shard_index(&self) -> Option<u64> {
        self.current.as_ref().map(|s| s.index)
    }

    /// Samples accepted so far.
    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    /// Whether `key` was already accepted in this run.
    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Output pattern.
    pub fn pattern(&self) -> &ShardPattern {
        &self.pattern
    }

    /// Thresholds.
    pub fn config(&self) -> &ShardConfig {
        &self.config
    }
}

impl fmt::Debug for ShardWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardWriter")
            .field("pattern", &self.pattern)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("open_shard", &self.open_shard_index())
            .field("sealed", &self.sealed.len())
            .field("total_samples", &self.total_samples)
            .finish()
    }
}

impl Drop for ShardWriter {
    fn drop(&mut self) {
        if self.state == WriterState::Active && self.current.is_some() {
            self.abort(&"writer dropped before close");
        }
    }
}

/// Path an open shard is written under.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// Write the end-of-archive marker, flush and fsync.
fn finish_file(builder: Builder<BufWriter<File>>) -> ShardResult<()> {
    let writer = builder.into_inner()?;
    let file = writer.into_inner().map_err(|e| ShardError::Io(e.into_error()))?;
    file.sync_all()?;
    Ok(())
}

/// Finish an abandoned shard right after its last complete sample.
///
/// Entries of a sample that failed halfway are cut off, so the file reads
/// back as whole samples followed by the end-of-archive marker.
fn finish_partial(builder: Builder<BufWriter<File>>, committed: u64) -> ShardResult<()> {
    let writer = builder.into_inner()?;
    let mut file = writer.into_inner().map_err(|e| ShardError::Io(e.into_error()))?;
    file.set_len(committed)?;
    file.seek(SeekFrom::Start(committed))?;
    file.write_all(&[0u8; 1024])?;
    file.sync_all()?;
    Ok(())
}
