//! Clap command tree definition.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("makeshards")
        .about("Convert a directory-of-classes image dataset into tar shards")
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("TOML file with default settings (flags override it)"),
        )
        .arg(
            Arg::new("splits")
                .long("splits")
                .help("Comma-separated splits to convert (default: train,val)"),
        )
        .arg(
            Arg::new("filekey")
                .long("filekey")
                .help("Use file stems as sample keys instead of running indices")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("maxsize")
                .long("maxsize")
                .help("Maximum tracked bytes per shard (default: 1e9)")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("maxcount")
                .long("maxcount")
                .help("Maximum samples per shard (default: 100000)")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("shards")
                .long("shards")
                .help("Destination directory for shards (default: ./shards)"),
        )
        .arg(
            Arg::new("data")
                .long("data")
                .help("Dataset root holding one directory per split (default: ./data)"),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .help("Shard file name prefix (default: imagenet)"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Shuffle seed for a reproducible sample order")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More logging (-v debug, -vv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log warnings and errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .global(true),
        )
        .subcommand(build_verify())
}

fn build_verify() -> Command {
    Command::new("verify")
        .about("Check shards or a shard index")
        .arg(
            Arg::new("paths")
                .help("Shard files (*.tar) or index files (*.json)")
                .required(true)
                .num_args(1..),
        )
}
