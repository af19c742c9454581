//! Error handling module for AudioFetch

use std::path::PathBuf;

use thiserror::Error;

/// Errors that invalidate a ClipRequest before any work is attempted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    /// Video identifier field was empty
    #[error("video identifier is empty")]
    EmptyId,

    /// Start time cannot be negative
    #[error("start time {0} is negative")]
    NegativeStart(f64),

    /// End time must lie strictly after the start time
    #[error("end time {end} is not after start time {start}")]
    EmptyWindow { start: f64, end: f64 },
}

/// Errors that abort the processing of one manifest (dataset split)
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file could not be opened
    #[error("failed to open manifest {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// I/O failure while reading rows
    #[error("failed to read manifest {path} at line {line}: {source}")]
    Read {
        path: PathBuf,
        line: usize,
        source: std::io::Error,
    },

    /// A non-skippable row did not parse; the split is considered corrupt
    #[error("malformed row in {path} at line {line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// Per-job failure, contained to the job that produced it.
///
/// The three kinds map to different operator actions: `Resolution` means the
/// source itself is unfetchable, `Process` points at the transcoder
/// invocation, and `Validation` means the transcoder produced a file that
/// does not match the requested output spec.
#[derive(Error, Debug)]
pub enum JobError {
    /// Source identifier unfetchable, or the clip window collapsed after
    /// clamping to the source's reported duration
    #[error("source resolution failed: {0}")]
    Resolution(String),

    /// Transcoder exited non-zero or produced no output file
    #[error("{message} (exit status {})", fmt_exit_code(.code))]
    Process {
        message: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// Output file's measured properties mismatch the requested spec
    #[error("output validation failed on {field}: expected {expected}, measured {actual}")]
    Validation {
        field: &'static str,
        expected: String,
        actual: String,
    },
}

impl JobError {
    /// Stable tag for log filtering and summaries
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::Resolution(_) => "resolution",
            JobError::Process { .. } => "process",
            JobError::Validation { .. } => "validation",
        }
    }

    /// Create a process failure from a captured subprocess output
    pub fn process(
        message: impl Into<String>,
        code: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        JobError::Process {
            message: message.into(),
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Errors raised while loading the optional TOML config file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected schema
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

fn fmt_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown".to_string(),
    }
}
