//! Shard index files written next to converted splits.

use crate::common::*;
use std::fs;
use tarshard::{
    convert_split, index_path, write_split_index, ConvertOptions, ImageFolder, ShardConfig,
    ShardIndex, ShardPattern, SHARD_INDEX_KIND,
};

#[test]
fn index_lists_every_shard() {
    let dir = temp_dir();
    let data = dir.path().join("data");
    let shards = dir.path().join("shards");
    make_image_folder(&data, "val", &["a", "b"], 5);

    let folder = ImageFolder::open(&data, "val").unwrap();
    let pattern = ShardPattern::for_split(&shards, "imagenet", "val").unwrap();
    let options = ConvertOptions {
        seed: Some(9),
        shard_config: ShardConfig::new().with_max_samples(4),
        ..ConvertOptions::default()
    };
    let summary = convert_split(&folder, pattern, &options).unwrap();
    let path = write_split_index(&shards, "imagenet", "val", &summary).unwrap();
    assert_eq!(path, index_path(&shards, "imagenet", "val"));
    assert!(path.ends_with("imagenet-val-index.json"));

    let json: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(json["__kind__"], SHARD_INDEX_KIND);
    assert_eq!(json["shardlist"].as_array().unwrap().len(), 3);
    assert_eq!(json["shardlist"][0]["url"], "imagenet-val-000000.tar");
    assert_eq!(json["shardlist"][2]["nsamples"], 2);

    let index = ShardIndex::read(&path).unwrap();
    assert_eq!(index.total_samples(), 10);
    let info = index.verify(&shards).unwrap();
    assert!(info.is_valid());
    assert_eq!(info.shards, 3);
}

#[test]
fn verify_detects_modified_shard() {
    let dir = temp_dir();
    let summary = write_run(dir.path(), 6, 700, MIN_MAX_BYTES, 3);
    let path = write_split_index(dir.path(), "test", "train", &summary).unwrap();

    let victim = &summary.shards[1].path;
    let mut bytes = fs::read(victim).unwrap();
    bytes[600] ^= 0xff;
    fs::write(victim, bytes).unwrap();

    let info = ShardIndex::read(&path).unwrap().verify(dir.path()).unwrap();
    assert!(!info.is_valid());
    assert_eq!(info.mismatched, ["shard-000001.tar"]);
}
