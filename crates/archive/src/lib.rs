//! Sharded archive writer
//!
//! This crate turns an ordered stream of samples into numbered tar shards:
//!
//! - ShardWriter: one run; lazy shard creation, prospective rollover,
//!   run-wide key uniqueness, seal-by-rename
//! - ShardBudget: per-shard byte and sample accounting
//! - ShardPattern: `%06d`-style shard path templates
//! - EncodedSample: the `<key>.jpg` / `<key>.cls` / `<key>.json` entry set
//! - ShardReader: reads shards back and validates sample grouping
//! - ShardIndex: JSON listing of a run's shards with checksums
//!
//! ## Archive Structure
//!
//! ```text
//! imagenet-train-000000.tar
//! ├── 0000000.jpg    encoded image bytes
//! ├── 0000000.cls    decimal class label
//! ├── 0000000.json   {"height":H,"width":W}
//! ├── 0000001.jpg
//! └── ...
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod budget;
pub mod config;
pub mod entry;
pub mod index;
pub mod pattern;
pub mod reader;
pub mod types;
pub mod writer;

pub use budget::ShardBudget;
pub use config::ShardConfig;
pub use entry::EncodedSample;
pub use index::{
    file_xxh3_hex, IndexVerifyInfo, ShardIndex, ShardIndexEntry, SHARD_INDEX_KIND,
    SHARD_INDEX_VERSION,
};
pub use pattern::ShardPattern;
pub use reader::{ShardContents, ShardReader};
pub use types::{RunSummary, ShardInfo, PARTIAL_SUFFIX};
pub use writer::{partial_path, ShardWriter, WriterState};
