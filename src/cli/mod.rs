//! CLI module for AudioFetch
//!
//! This module handles command-line argument parsing.

use clap::{Parser, Subcommand};

pub mod args;

/// AudioFetch dataset builder
///
/// Fetches short audio clips of online videos listed in manifest files,
/// transcodes them to a canonical format and validates the result before
/// accepting it into the dataset.
#[derive(Parser)]
#[command(name = "audiofetch")]
#[command(about = "AudioFetch - validated audio-clip datasets from video manifests")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and validate the clips listed in one or more manifests
    Fetch(args::FetchArgs),
    /// Inspect the measured properties of an audio file
    Inspect(args::InspectArgs),
}
