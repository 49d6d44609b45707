//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, RgbImage};
use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tarshard::{Sample, SampleMetadata, ShardWriter};
use tempfile::TempDir;

/// Bytes tracked per sample beyond the payload for label 0 and 1x1 metadata:
/// `"0"` plus `{"height":1,"width":1}`.
pub const SIDE_BYTES: u64 = 23;

/// Smallest byte threshold the writer accepts.
pub const MIN_MAX_BYTES: u64 = 10_000_001;

/// A sample with `len` payload bytes, label 0 and 1x1 metadata.
pub fn sample(key: &str, len: usize) -> Sample {
    Sample::new(
        key,
        vec![(len % 251) as u8; len],
        0,
        SampleMetadata {
            height: 1,
            width: 1,
        },
    )
}

/// Key for the i-th generated sample.
pub fn key(i: usize) -> String {
    format!("s{:05}", i)
}

/// Shard pattern inside `dir`.
pub fn pattern_in(dir: &Path) -> String {
    format!("{}/shard-%06d.tar", dir.display())
}

/// Write `count` samples of `len` bytes and finish the run.
pub fn write_run(
    dir: &Path,
    count: usize,
    len: usize,
    max_bytes: u64,
    max_samples: u64,
) -> tarshard::RunSummary {
    let mut writer = ShardWriter::open(&pattern_in(dir), max_bytes, max_samples).unwrap();
    for i in 0..count {
        writer.write(&sample(&key(i), len)).unwrap();
    }
    writer.finish().unwrap()
}

/// Sorted file names in `dir`.
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// Entry names of a tar file in archive order.
pub fn tar_entry_names(path: &Path) -> Vec<String> {
    let mut archive = tar::Archive::new(File::open(path).unwrap());
    archive
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().to_string_lossy().to_string())
        .collect()
}

/// PNG bytes of a black image.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::new(width, height))
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// Build `<root>/<split>/<class>/<class>_<i>.png` with distinct sizes.
///
/// Image i of class c is `(c + 1) x (i + 1)` pixels.
pub fn make_image_folder(
    root: &Path,
    split: &str,
    classes: &[&str],
    per_class: usize,
) -> PathBuf {
    let split_dir = root.join(split);
    for (c, class) in classes.iter().enumerate() {
        let class_dir = split_dir.join(class);
        fs::create_dir_all(&class_dir).unwrap();
        for i in 0..per_class {
            let file = class_dir.join(format!("{}_{}.png", class, i));
            fs::write(file, png_bytes(c as u32 + 1, i as u32 + 1)).unwrap();
        }
    }
    split_dir
}

/// Fresh temporary directory.
pub fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}
