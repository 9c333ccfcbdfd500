use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for rawbids
#[derive(Parser, Debug)]
#[command(name = "rawbids")]
#[command(about = "Standardize raw scanner output into a session-structured layout")]
#[command(version)]
pub struct Cli {
    /// Single subject raw data directory
    #[arg(value_name = "RAW_DIR")]
    pub raw_dir: PathBuf,

    /// Standardized output root (created if absent)
    #[arg(value_name = "OUT_DIR")]
    pub out_dir: PathBuf,

    /// External converter binary, overriding the site default
    #[arg(short, long, value_name = "PATH")]
    pub converter: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
