//! Bounded-concurrency dispatch of clip jobs
//!
//! A fixed number of permits bounds how many pipelines run at once; each
//! job is fully independent, so the only coordination is the permit itself.
//! Failures are handed to the reporter and never stop the batch. A corrupt
//! manifest row or an external cancellation stops dispatch of new jobs, but
//! jobs already in flight always drain — a worker is never abandoned in the
//! middle of writing its output file.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::domain::model::ClipRequest;
use crate::error::ManifestError;
use crate::pipeline::ClipPipeline;
use crate::report::{BatchSummary, Reporter};

/// Default number of concurrent clip jobs
pub const DEFAULT_CONCURRENCY: usize = 8;

/// What a drained batch looked like
#[derive(Debug, Clone, Copy)]
pub struct BatchResult {
    pub summary: BatchSummary,
    /// True when dispatch stopped because of the external cancellation
    /// signal; completed work has still been reported
    pub cancelled: bool,
}

/// Runs many clip pipelines against a stream of requests
pub struct WorkerPool {
    pipeline: Arc<ClipPipeline>,
    reporter: Arc<Reporter>,
    concurrency: usize,
}

impl WorkerPool {
    pub fn new(pipeline: Arc<ClipPipeline>, reporter: Arc<Reporter>, concurrency: usize) -> Self {
        Self {
            pipeline,
            reporter,
            concurrency: concurrency.max(1),
        }
    }

    /// Dispatch every request to a worker and block until all dispatched
    /// jobs have completed.
    ///
    /// A manifest error stops dispatch and propagates after the drain; the
    /// jobs dispatched before it still run to completion and are reported.
    pub async fn run<I>(
        &self,
        requests: I,
        output_dir: &Path,
        shutdown: watch::Receiver<bool>,
    ) -> Result<BatchResult, ManifestError>
    where
        I: IntoIterator<Item = Result<ClipRequest, ManifestError>>,
    {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks: JoinSet<()> = JoinSet::new();
        let mut cancelled = false;
        let mut fatal: Option<ManifestError> = None;

        for item in requests {
            if *shutdown.borrow() {
                cancelled = true;
                break;
            }

            let request = match item {
                Ok(request) => request,
                Err(e) => {
                    fatal = Some(e);
                    break;
                }
            };

            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .expect("semaphore is never closed");

            // The signal may have arrived while waiting for a free worker;
            // never dispatch a new job after observing it.
            if *shutdown.borrow() {
                cancelled = true;
                break;
            }

            let pipeline = Arc::clone(&self.pipeline);
            let reporter = Arc::clone(&self.reporter);
            let output_dir = output_dir.to_path_buf();
            tasks.spawn(async move {
                let _permit = permit;
                let outcome = pipeline.run(request.clone(), &output_dir).await;
                reporter.report(&request, &outcome);
            });
        }

        if cancelled {
            warn!(
                in_flight = tasks.len(),
                "cancellation received, draining in-flight jobs"
            );
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                // A panicked worker loses its own job only
                error!(error = %e, "worker task aborted");
            }
        }

        if let Some(e) = fatal {
            return Err(e);
        }

        let summary = self.reporter.summary();
        info!(
            succeeded = summary.succeeded,
            skipped = summary.skipped,
            failed = summary.failed,
            "batch drained"
        );
        Ok(BatchResult { summary, cancelled })
    }
}
