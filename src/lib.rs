//! AudioFetch Library
//!
//! Builds audio datasets by fetching short clips of online videos: a
//! manifest of (identifier, start time) rows is turned into a directory of
//! validated, canonically-formatted audio files by a bounded pool of
//! concurrent clip pipelines. Failures are isolated per job; re-running a
//! batch skips everything that already exists.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod pool;
pub mod ports;
pub mod report;

// Re-export commonly used types
pub use domain::model::{ClipRequest, JobOutcome, OutputSpec, DEFAULT_WINDOW_SECS};
pub use error::{ConfigError, JobError, ManifestError, RequestError};
pub use pipeline::ClipPipeline;
pub use pool::{WorkerPool, DEFAULT_CONCURRENCY};
pub use report::{BatchSummary, Reporter};
