//! karamel CLI - file inspection and streaming digests

use clap::Parser;
use karamel::config::{CliArgs, Commands, HashAlgorithm, HashArgs, HashConfig};
use karamel::error::{KaramelError, Result};
use karamel::fs::{hide_file, FileInfo, FileOptions};
use karamel::hash::{hash_file_with_config, DigestResult};
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; RUST_LOG wins over -v/-q
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Handle result
    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every requested operation succeeded
fn run(args: CliArgs) -> Result<bool> {
    match &args.command {
        Commands::Hash(hash_args) => cmd_hash(hash_args),
        Commands::Info { path, json } => cmd_info(path, *json).map(|_| true),
        Commands::Hide { path } => cmd_hide(path).map(|_| true),
        Commands::Algorithms => {
            cmd_algorithms();
            Ok(true)
        }
    }
}

#[derive(Serialize)]
struct HashReport<'a> {
    path: &'a Path,
    #[serde(flatten)]
    digest: DigestResult,
}

fn cmd_hash(args: &HashArgs) -> Result<bool> {
    let config = HashConfig::from_cli(args).map_err(KaramelError::ConfigError)?;
    tracing::info!(
        "Hashing {} file(s) with {} in {} byte chunks",
        args.paths.len(),
        config.algorithm.name(),
        config.effective_chunk_size()
    );

    let mut reports = Vec::new();
    let mut all_ok = true;

    for path in &args.paths {
        match hash_file_with_config(path, &config) {
            Ok(digest) if args.json => reports.push(HashReport { path, digest }),
            Ok(digest) => println!("{}  {}", digest, path.display()),
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                all_ok = false;
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(all_ok)
}

fn cmd_info(path: &Path, json: bool) -> Result<()> {
    let info = FileInfo::open(path, FileOptions::default())?;
    let descriptor = info.descriptor();

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
        return Ok(());
    }

    println!("Path:     {}", descriptor.path.display());
    println!(
        "Size:     {} ({} bytes)",
        humansize::format_size(descriptor.size, humansize::BINARY),
        descriptor.size
    );
    println!("Modified: {}", descriptor.human_modified);
    println!("Created:  {:.6}", descriptor.created);

    Ok(())
}

fn cmd_hide(path: &Path) -> Result<()> {
    let hidden = hide_file(path)?;
    println!("{}", hidden.display());
    Ok(())
}

fn cmd_algorithms() {
    println!("{:10} {:>10} {:>10}  {}", "ID", "BLOCK", "OUTPUT", "NOTE");
    for algorithm in HashAlgorithm::ALL {
        let note = if algorithm.is_deprecated() {
            "deprecated"
        } else {
            ""
        };
        println!(
            "{:10} {:>10} {:>10}  {}",
            algorithm.id(),
            algorithm.chunk_size(),
            algorithm.output_size(),
            note
        );
    }
}
