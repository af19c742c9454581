//! Per-job outcome reporting
//!
//! The reporter surfaces every outcome as a diagnostic and keeps running
//! totals. It never fails and never stops the pool; a failed job is a log
//! line and a counter, nothing more.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{error, info};

use crate::domain::model::{ClipRequest, JobOutcome};
use crate::error::JobError;

/// Totals for one batch, snapshot from the reporter when the pool drains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}

/// Outcome sink shared by all workers in a pool
#[derive(Debug, Default)]
pub struct Reporter {
    succeeded: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one terminal outcome
    pub fn report(&self, request: &ClipRequest, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Succeeded(path) => {
                self.succeeded.fetch_add(1, Ordering::Relaxed);
                info!(
                    id = %request.video_id,
                    path = %path.display(),
                    "clip acquired"
                );
            }
            JobOutcome::Skipped(path) => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
                info!(
                    id = %request.video_id,
                    path = %path.display(),
                    "output already exists, skipping"
                );
            }
            JobOutcome::Failed(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                self.report_failure(request, e);
            }
        }
    }

    fn report_failure(&self, request: &ClipRequest, e: &JobError) {
        match e {
            JobError::Process {
                stdout, stderr, ..
            } => {
                error!(
                    id = %request.video_id,
                    start = request.start,
                    kind = e.kind(),
                    stdout = %stdout.trim_end(),
                    stderr = %stderr.trim_end(),
                    "job failed: {e}"
                );
            }
            _ => {
                error!(
                    id = %request.video_id,
                    start = request.start,
                    kind = e.kind(),
                    "job failed: {e}"
                );
            }
        }
    }

    /// Snapshot the running totals
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            succeeded: self.succeeded.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
