//! Integration tests for shard writing.
//!
//! Unit tests in crates/archive/src/ cover budget accounting, entry encoding
//! and the writer state machine in isolation. These tests cover the
//! end-to-end guarantees: shard files on disk, crash-visible naming, and the
//! dataset-to-shards pipeline.

#[path = "../common/mod.rs"]
mod common;

mod index;
mod pipeline;
mod rollover;
