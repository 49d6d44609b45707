//! tarshard - labeled image datasets to size- and count-bounded tar shards
//!
//! tarshard converts a directory-of-classes image dataset into numbered tar
//! shards for streaming training pipelines. Each sample lands in exactly
//! one shard as three entries (`<key>.jpg`, `<key>.cls`, `<key>.json`).
//!
//! # Quick Start
//!
//! ```ignore
//! use tarshard::{Sample, SampleMetadata, ShardWriter};
//!
//! let mut writer = ShardWriter::open("shards/imagenet-train-%06d.tar", 1_000_000_000, 100_000)?;
//! writer.write(&Sample::new("0000000", jpeg_bytes, 7, SampleMetadata { height: 375, width: 500 }))?;
//! let summary = writer.finish()?;
//! ```
//!
//! # Architecture
//!
//! - `tarshard-core`: sample model, key policy, error taxonomy
//! - `tarshard-archive`: the shard writer, reader and index
//! - `tarshard-dataset`: dataset enumeration, dimension probe, shuffle
//! - [`convert`]: the per-split driver tying them together

pub mod convert;

pub use convert::{
    build_sample, convert_split, index_path, write_split_index, ConvertError, ConvertOptions,
    ConvertResult, DEFAULT_PREFIX,
};
pub use tarshard_archive::*;
pub use tarshard_core::*;
pub use tarshard_dataset::*;
