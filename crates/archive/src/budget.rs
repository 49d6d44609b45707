//! Per-shard size and count accounting
//!
//! The rollover decision is prospective: before a sample is appended, the
//! budget answers whether it still fits. A shard that already holds a
//! sample rolls over when the next sample would push its tracked bytes
//! past `max_bytes` or when it already holds `max_samples` samples. An
//! empty shard admits anything, so a single oversized sample lands alone
//! in its own shard instead of being rejected.

/// Running totals of the open shard against its thresholds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardBudget {
    max_bytes: u64,
    max_samples: u64,
    byte_count: u64,
    sample_count: u64,
}

impl ShardBudget {
    /// Create an empty budget.
    pub fn new(max_bytes: u64, max_samples: u64) -> Self {
        Self {
            max_bytes,
            max_samples,
            byte_count: 0,
            sample_count: 0,
        }
    }

    /// Whether a sample of `entry_bytes` must go to the next shard.
    pub fn needs_rollover(&self, entry_bytes: u64) -> bool {
        if self.sample_count == 0 {
            return false;
        }
        self.sample_count >= self.max_samples
            || self.byte_count.saturating_add(entry_bytes) > self.max_bytes
    }

    /// Account for an appended sample.
    pub fn admit(&mut self, entry_bytes: u64) {
        self.byte_count = self.byte_count.saturating_add(entry_bytes);
        self.sample_count += 1;
    }

    /// Tracked bytes so far.
    pub fn byte_count(&self) -> u64 {
        self.byte_count
    }

    /// Samples so far.
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// True before the first sample.
    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }

    /// True for a lone sample larger than `max_bytes`.
    pub fn is_oversized(&self) -> bool {
        self.byte_count > self.max_bytes
    }
}
