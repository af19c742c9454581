//! AudioFetch CLI
//!
//! Builds validated audio-clip datasets from manifests of online videos.
//! One manifest file describes one dataset split; every row becomes one
//! bounded-concurrency clip job that resolves the source, transcodes the
//! ten-second window and validates the produced file.
//!
//! # Usage
//!
//! ```bash
//! audiofetch fetch data/train.csv data/val.csv --out AudioCaps
//! audiofetch fetch data/test.csv --out AudioCaps --jobs 4
//! audiofetch inspect --input AudioCaps/train/abc123_5000_15000.wav --json
//! ```

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use audiofetch::adapters::ffmpeg::DEFAULT_FETCH_TIMEOUT_US;
use audiofetch::adapters::{FfmpegTranscoder, FfprobeInspector, YtDlpResolver};
use audiofetch::cli::args::{FetchArgs, InspectArgs};
use audiofetch::cli::{Cli, Commands};
use audiofetch::config::FileConfig;
use audiofetch::manifest::ManifestReader;
use audiofetch::pipeline::ClipPipeline;
use audiofetch::pool::{WorkerPool, DEFAULT_CONCURRENCY};
use audiofetch::ports::MediaInspector;
use audiofetch::report::Reporter;

/// Main entry point for the AudioFetch CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the --log-level flag
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    match cli.command {
        Commands::Fetch(args) => run_fetch(args).await,
        Commands::Inspect(args) => run_inspect(args).await,
    }
}

/// Run the acquisition batch, one split per manifest file
async fn run_fetch(args: FetchArgs) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let spec = file_config.output.clone().unwrap_or_default();
    let jobs = args
        .jobs
        .or(file_config.jobs)
        .unwrap_or(DEFAULT_CONCURRENCY);
    let fetch_timeout_us = args
        .fetch_timeout_us
        .or(file_config.fetch_timeout_us)
        .unwrap_or(DEFAULT_FETCH_TIMEOUT_US);

    let pipeline = Arc::new(ClipPipeline::new(
        Arc::new(YtDlpResolver::new()),
        Arc::new(FfmpegTranscoder::new(fetch_timeout_us)),
        Arc::new(FfprobeInspector::new()),
        spec,
    ));

    // An interrupt stops dispatch of new jobs; in-flight jobs drain so no
    // partially-written file is left under its final name.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, draining in-flight jobs");
            let _ = shutdown_tx.send(true);
        }
    });

    let mut aborted_splits = 0usize;
    for manifest_path in &args.manifests {
        if *shutdown_rx.borrow() {
            bail!("interrupted");
        }

        let split = manifest_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "clips".to_string());
        let split_dir = args.out.join(&split);
        std::fs::create_dir_all(&split_dir).with_context(|| {
            format!("failed to create output directory {}", split_dir.display())
        })?;

        info!(split = %split, manifest = %manifest_path.display(), "starting download jobs");

        let reader = match ManifestReader::open(manifest_path) {
            Ok(reader) => reader,
            Err(e) => {
                error!(split = %split, error = %e, "split aborted");
                aborted_splits += 1;
                continue;
            }
        };

        let reporter = Arc::new(Reporter::new());
        let pool = WorkerPool::new(Arc::clone(&pipeline), Arc::clone(&reporter), jobs);
        match pool.run(reader, &split_dir, shutdown_rx.clone()).await {
            Ok(result) => {
                info!(split = %split, "finished download jobs");
                if result.cancelled {
                    bail!("interrupted; completed jobs have been reported");
                }
            }
            // A corrupt manifest aborts its own split only
            Err(e) => {
                error!(split = %split, error = %e, "split aborted");
                aborted_splits += 1;
            }
        }
    }

    if aborted_splits > 0 {
        bail!("{aborted_splits} split(s) aborted on manifest errors");
    }
    Ok(())
}

/// Probe a single audio file and print its measured properties
async fn run_inspect(args: InspectArgs) -> Result<()> {
    let inspector = FfprobeInspector::new();
    let properties = inspector
        .inspect(&args.input)
        .await
        .with_context(|| format!("failed to inspect {}", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&properties)?);
    } else {
        println!("duration:    {:.3} s", properties.duration);
        println!("channels:    {}", properties.channels);
        println!("sample rate: {} Hz", properties.sample_rate);
        println!("codec:       {}", properties.codec);
    }
    Ok(())
}
