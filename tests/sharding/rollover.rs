//! Shard boundaries from the count and size thresholds.

use crate::common::*;
use std::collections::HashSet;
use tarshard::{ShardReader, ShardWriter};

#[test]
fn count_threshold_partitions_run() {
    let dir = temp_dir();
    let summary = write_run(dir.path(), 250, 16, 1_000_000_000, 100);

    assert_eq!(summary.sample_counts(), vec![100, 100, 50]);
    assert_eq!(summary.total_samples, 250);
    assert_eq!(
        list_dir(dir.path()),
        ["shard-000000.tar", "shard-000001.tar", "shard-000002.tar"]
    );
}

#[test]
fn every_sample_in_exactly_one_shard() {
    let dir = temp_dir();
    let summary = write_run(dir.path(), 37, 8, 1_000_000_000, 10);

    let mut seen = HashSet::new();
    for shard in &summary.shards {
        for key in ShardReader::read_keys(&shard.path).unwrap() {
            assert!(seen.insert(key.clone()), "key {} stored twice", key);
        }
    }
    let expected: HashSet<String> = (0..37).map(key).collect();
    assert_eq!(seen, expected);
}

#[test]
fn size_threshold_partitions_run() {
    let dir = temp_dir();
    let len = 3_000_000;
    let summary = write_run(dir.path(), 7, len, MIN_MAX_BYTES, 1000);

    assert_eq!(summary.sample_counts(), vec![3, 3, 1]);
    for shard in &summary.shards {
        assert!(shard.byte_count <= MIN_MAX_BYTES);
        assert_eq!(shard.byte_count, shard.sample_count * (len as u64 + SIDE_BYTES));
    }
}

#[test]
fn exact_fit_stays_in_shard() {
    let dir = temp_dir();
    let max_bytes = 10_000_002;
    let len = (max_bytes / 2 - SIDE_BYTES) as usize;
    let summary = write_run(dir.path(), 3, len, max_bytes, 1000);

    assert_eq!(summary.sample_counts(), vec![2, 1]);
    assert_eq!(summary.shards[0].byte_count, max_bytes);
}

#[test]
fn first_threshold_reached_wins() {
    let dir = temp_dir();
    let len = 4_000_000;

    // Size bound admits two samples, count bound admits three.
    let summary = write_run(dir.path(), 5, len, MIN_MAX_BYTES, 3);
    assert_eq!(summary.sample_counts(), vec![2, 2, 1]);

    let dir = temp_dir();
    let summary = write_run(dir.path(), 5, 10, MIN_MAX_BYTES, 3);
    assert_eq!(summary.sample_counts(), vec![3, 2]);
}

#[test]
fn oversized_sample_gets_its_own_shard() {
    let dir = temp_dir();
    let mut writer = ShardWriter::open(&pattern_in(dir.path()), MIN_MAX_BYTES, 1000).unwrap();
    writer.write(&sample("small0", 1000)).unwrap();
    writer.write(&sample("huge", 12_000_000)).unwrap();
    writer.write(&sample("small1", 1000)).unwrap();
    let summary = writer.finish().unwrap();

    assert_eq!(summary.sample_counts(), vec![1, 1, 1]);
    assert!(summary.shards[1].byte_count > MIN_MAX_BYTES);
    assert_eq!(
        ShardReader::read_keys(&summary.shards[1].path).unwrap(),
        ["huge"]
    );
}

#[test]
fn shard_indices_are_contiguous() {
    let dir = temp_dir();
    let summary = write_run(dir.path(), 45, 4, 1_000_000_000, 4);

    let indices: Vec<u64> = summary.shards.iter().map(|s| s.index).collect();
    let expected: Vec<u64> = (0..12).collect();
    assert_eq!(indices, expected);
    for shard in &summary.shards {
        assert_eq!(
            shard.path.file_name().unwrap().to_string_lossy(),
            format!("shard-{:06}.tar", shard.index)
        );
    }
}
