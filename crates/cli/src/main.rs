//! makeshards - convert a directory-of-classes image dataset into tar shards.
//!
//! Two modes:
//! - **Convert** (default): `makeshards [flags]` writes
//!   `<shards>/<prefix>-<split>-NNNNNN.tar` plus an index per split
//! - **Verify**: `makeshards verify <path>...` checks shards or index files

mod commands;
mod config;
mod run;

use std::path::PathBuf;
use std::process;

use tracing::Level;

use commands::build_cli;
use config::CliConfig;

fn main() {
    let matches = build_cli().get_matches();
    init_logging(&matches);

    if let Some(("verify", sub)) = matches.subcommand() {
        let paths: Vec<PathBuf> = sub
            .get_many::<String>("paths")
            .into_iter()
            .flatten()
            .map(PathBuf::from)
            .collect();
        match run::run_verify(&paths) {
            Ok(lines) => {
                for line in lines {
                    println!("{}", line);
                }
            }
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
        return;
    }

    let plan = match CliConfig::from_matches(&matches).and_then(|c| run::check_preconditions(&c)) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    match run::run_convert(&plan) {
        Ok(reports) => {
            for report in reports {
                println!(
                    "{}: {} samples in {} shards ({})",
                    report.split,
                    report.samples,
                    report.shards,
                    report.index.display()
                );
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn init_logging(matches: &clap::ArgMatches) {
    let level = if matches.get_flag("quiet") {
        Level::WARN
    } else {
        match matches.get_count("verbose") {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
