// Declare modules
pub mod checker;
pub mod cli;
pub mod config;
pub mod models;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::{Path, PathBuf};

use self::checker::PatternChecker;
use self::cli::Cli;
use self::config::{locate_config_file, resolve_config};

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Locate the Configuration File
    let config_path = locate_config_file(args.config.as_deref())?;

    // 3. Resolve Configuration (file values + CLI extras), failing fast on
    //    anything malformed
    let config = resolve_config(&config_path, &args)?;

    if config.safelist.is_empty() {
        log::info!("Safelist is empty; only class names found by scanning survive pruning.");
    }

    // 4. Output Branch
    if args.check {
        // --check mode: count files per content pattern so dead globs show up
        // before the generation tool runs an empty scan
        let root = scan_root(&config_path)?;
        let checker = PatternChecker::new(root.clone(), &config)?;
        for report in checker.check() {
            if report.matches == 0 {
                log::warn!(
                    "⚠️ Pattern {:?} matches no files under {:?}",
                    report.pattern,
                    root
                );
            }
            println!("{:>6}  {}", report.matches, report.pattern);
        }
    } else {
        // Default mode: emit the resolved record as canonical TOML
        let rendered = toml::to_string_pretty(&config)
            .context("Failed to serialize the resolved configuration")?;
        print!("{}", rendered);
    }

    Ok(())
}

/// Content patterns are interpreted relative to the config file's directory.
fn scan_root(config_path: &Path) -> Result<PathBuf> {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        _ => env::current_dir().context("Failed to get current directory"),
    }
}
