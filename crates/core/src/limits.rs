//! Rollover thresholds and naming widths
//!
//! The floors exist to keep shard counts sane: a tiny byte threshold or a
//! huge per-shard sample count produces pathological shard sets. Both are
//! strict bounds: `max_bytes` must be strictly greater than
//! [`MIN_MAX_BYTES_FLOOR`] and `max_samples` strictly less than
//! [`MAX_SAMPLES_CEILING`].

/// `max_bytes` must exceed this value (10 MB).
pub const MIN_MAX_BYTES_FLOOR: u64 = 10_000_000;

/// `max_samples` must stay below this value.
pub const MAX_SAMPLES_CEILING: u64 = 1_000_000;

/// Default byte threshold per shard (1 GB).
pub const DEFAULT_MAX_BYTES: u64 = 1_000_000_000;

/// Default sample threshold per shard.
pub const DEFAULT_MAX_SAMPLES: u64 = 100_000;

/// Zero-padding width of the shard index in default shard names.
pub const SHARD_INDEX_WIDTH: usize = 6;
