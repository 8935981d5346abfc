use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Load, validate and inspect the scan configuration for utility-class generation"
)]
pub struct Cli {
    /// Path to the configuration file (defaults to ./scan.toml)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Extra content glob patterns appended to the file's list (e.g., './src/**/*.html')
    #[arg(long, num_args = 1..)]
    pub content: Option<Vec<String>>,

    /// Extra class names appended to the safelist
    #[arg(long, num_args = 1..)]
    pub safelist: Option<Vec<String>>,

    /// Report how many files each content pattern matches instead of emitting TOML
    #[arg(long)]
    pub check: bool,
}
