//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the fetch command
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Manifest CSV files, one per dataset split; the split directory is
    /// named after the file stem
    #[arg(required = true)]
    pub manifests: Vec<PathBuf>,

    /// Dataset root directory
    #[arg(short, long, default_value = "dataset")]
    pub out: PathBuf,

    /// Number of concurrent clip jobs (default: 8)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Bound on the stream-fetch stage in microseconds (default: 5000000)
    #[arg(long)]
    pub fetch_timeout_us: Option<u64>,

    /// Optional TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Audio file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
