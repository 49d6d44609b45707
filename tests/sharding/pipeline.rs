//! Dataset enumeration through conversion into shards.

use crate::common::*;
use std::collections::HashMap;
use std::fs;
use tarshard::{
    convert_split, ConvertError, ConvertOptions, DatasetError, ImageFolder, KeyPolicy,
    SampleSource, ShardConfig, ShardError, ShardPattern, ShardReader,
};

const CLASSES: [&str; 3] = ["ant", "bee", "cat"];

fn options(max_samples: u64, seed: u64) -> ConvertOptions {
    ConvertOptions {
        key_policy: KeyPolicy::Index,
        seed: Some(seed),
        shard_config: ShardConfig::new().with_max_samples(max_samples),
    }
}

#[test]
fn converted_samples_match_source_files() {
    let dir = temp_dir();
    let data = dir.path().join("data");
    let shards = dir.path().join("shards");
    make_image_folder(&data, "train", &CLASSES, 4);

    let folder = ImageFolder::open(&data, "train").unwrap();
    let pattern = ShardPattern::for_split(&shards, "imagenet", "train").unwrap();
    let summary = convert_split(&folder, pattern, &options(5, 11)).unwrap();

    assert_eq!(summary.sample_counts(), vec![5, 5, 2]);
    assert_eq!(
        list_dir(&shards),
        [
            "imagenet-train-000000.tar",
            "imagenet-train-000001.tar",
            "imagenet-train-000002.tar",
        ]
    );

    let mut seen = 0;
    for shard in &summary.shards {
        for stored in ShardReader::read_samples(&shard.path).unwrap() {
            let index: usize = stored.key.parse().unwrap();
            assert_eq!(stored.key.len(), 7);
            let entry = folder.entry(index).unwrap();
            assert_eq!(stored.label, entry.label);
            assert_eq!(stored.payload, fs::read(&entry.path).unwrap());

            // Image i of class c is (c + 1) x (i + 1).
            let stem = entry.path.file_stem().unwrap().to_string_lossy().to_string();
            let i: u32 = stem.rsplit('_').next().unwrap().parse().unwrap();
            assert_eq!(stored.metadata.width, entry.label + 1);
            assert_eq!(stored.metadata.height, i + 1);
            seen += 1;
        }
    }
    assert_eq!(seen, folder.len());
}

#[test]
fn seed_fixes_sample_order() {
    let dir = temp_dir();
    let data = dir.path().join("data");
    make_image_folder(&data, "train", &CLASSES, 5);
    let folder = ImageFolder::open(&data, "train").unwrap();

    let keys_for = |name: &str, seed: u64| {
        let out = dir.path().join(name);
        let pattern = ShardPattern::for_split(&out, "imagenet", "train").unwrap();
        let summary = convert_split(&folder, pattern, &options(100, seed)).unwrap();
        ShardReader::read_keys(&summary.shards[0].path).unwrap()
    };

    let a = keys_for("a", 5);
    let b = keys_for("b", 5);
    assert_eq!(a, b);
    assert_eq!(a.len(), 15);

    let mut sorted = a.clone();
    sorted.sort();
    let expected: Vec<String> = (0..15).map(|i| format!("{:07}", i)).collect();
    assert_eq!(sorted, expected);
}

#[test]
fn shards_mix_classes() {
    let dir = temp_dir();
    let data = dir.path().join("data");
    make_image_folder(&data, "train", &CLASSES, 20);
    let folder = ImageFolder::open(&data, "train").unwrap();

    let pattern = ShardPattern::for_split(&dir.path().join("out"), "imagenet", "train").unwrap();
    let summary = convert_split(&folder, pattern, &options(20, 1)).unwrap();

    let first = ShardReader::read_samples(&summary.shards[0].path).unwrap();
    let mut per_label: HashMap<u32, usize> = HashMap::new();
    for sample in &first {
        *per_label.entry(sample.label).or_default() += 1;
    }
    assert!(per_label.len() > 1, "shard holds a single class");
}

#[test]
fn filekey_collision_aborts_run() {
    let dir = temp_dir();
    let data = dir.path().join("data");
    make_image_folder(&data, "train", &CLASSES[..1], 2);
    let other = data.join("train").join("zebra");
    fs::create_dir_all(&other).unwrap();
    fs::write(other.join("ant_0.png"), png_bytes(2, 2)).unwrap();

    let folder = ImageFolder::open(&data, "train").unwrap();
    let shards = dir.path().join("shards");
    let pattern = ShardPattern::for_split(&shards, "imagenet", "train").unwrap();
    let opts = ConvertOptions {
        key_policy: KeyPolicy::FileStem,
        ..options(100, 0)
    };

    let err = convert_split(&folder, pattern, &opts).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::Shard(ShardError::DuplicateKey { ref key }) if key == "ant_0"
    ));
    assert_eq!(list_dir(&shards), ["imagenet-train-000000.tar.partial"]);
}

#[test]
fn repeated_file_name_aborts_index_keyed_run() {
    let dir = temp_dir();
    let data = dir.path().join("data");
    make_image_folder(&data, "train", &CLASSES[..1], 2);
    let other = data.join("train").join("zebra");
    fs::create_dir_all(&other).unwrap();
    fs::write(other.join("ant_0.png"), png_bytes(2, 2)).unwrap();

    let folder = ImageFolder::open(&data, "train").unwrap();
    let shards = dir.path().join("shards");
    let pattern = ShardPattern::for_split(&shards, "imagenet", "train").unwrap();

    let err = convert_split(&folder, pattern, &options(100, 0)).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::Shard(ShardError::DuplicateKey { ref key }) if key == "ant_0"
    ));
    assert_eq!(list_dir(&shards), ["imagenet-train-000000.tar.partial"]);
}

#[test]
fn undecodable_image_reports_path() {
    let dir = temp_dir();
    let data = dir.path().join("data");
    make_image_folder(&data, "train", &CLASSES[..1], 1);
    fs::write(data.join("train").join("ant").join("broken.png"), b"not an image").unwrap();

    let folder = ImageFolder::open(&data, "train").unwrap();
    let pattern = ShardPattern::for_split(&dir.path().join("out"), "imagenet", "train").unwrap();
    let err = convert_split(&folder, pattern, &options(100, 0)).unwrap_err();

    match err {
        ConvertError::Dataset(DatasetError::Decode { path, .. }) => {
            assert!(path.ends_with("broken.png"))
        }
        other => panic!("unexpected error: {}", other),
    }
}
