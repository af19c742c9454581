//! The per-job state machine: resolve, clamp, skip-check, transcode,
//! validate, clean up on failure
//!
//! Steps are ordered so that network/availability failures are told apart
//! from local process failures and from content-correctness failures; each
//! calls for a different operator action. A job only ever touches its own
//! output path, so many pipelines can run against the same directory.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::model::{ClipRequest, JobOutcome, OutputSpec};
use crate::error::JobError;
use crate::ports::{MediaInspector, SourceResolver, Transcoder};

/// Millisecond-precision equality, the finest unit the output filename
/// itself encodes
fn millis_eq(a: f64, b: f64) -> bool {
    (a * 1000.0).round() == (b * 1000.0).round()
}

/// One clip job from manifest row to validated file
pub struct ClipPipeline {
    resolver: Arc<dyn SourceResolver>,
    transcoder: Arc<dyn Transcoder>,
    inspector: Arc<dyn MediaInspector>,
    spec: OutputSpec,
}

impl ClipPipeline {
    pub fn new(
        resolver: Arc<dyn SourceResolver>,
        transcoder: Arc<dyn Transcoder>,
        inspector: Arc<dyn MediaInspector>,
        spec: OutputSpec,
    ) -> Self {
        Self {
            resolver,
            transcoder,
            inspector,
            spec,
        }
    }

    pub fn spec(&self) -> &OutputSpec {
        &self.spec
    }

    /// Run one request to its terminal outcome.
    ///
    /// Creates at most one file in `output_dir` and mutates nothing else;
    /// the end-time clamp happens on this invocation's own copy of the
    /// request.
    pub async fn run(&self, mut request: ClipRequest, output_dir: &Path) -> JobOutcome {
        let source = match self.resolver.resolve(&request.video_id).await {
            Ok(source) => source,
            Err(e) => return JobOutcome::Failed(e),
        };

        request.clamp_end(source.duration);
        if request.end <= request.start {
            return JobOutcome::Failed(JobError::Resolution(format!(
                "window [{}, {}) is empty after clamping to source duration {}",
                request.start, request.end, source.duration
            )));
        }

        let output_path = output_dir.join(request.file_name(&self.spec));

        // Existence is terminal success; re-running a batch is safe and
        // cheap. The check sits immediately before the transcoder so a
        // duplicate manifest row observes the first writer's output.
        if output_path.exists() {
            debug!(path = %output_path.display(), "output already exists");
            return JobOutcome::Skipped(output_path);
        }

        if let Err(e) = self
            .transcoder
            .transcode(&source, &request, &self.spec, &output_path)
            .await
        {
            return JobOutcome::Failed(e);
        }

        if !output_path.exists() {
            return JobOutcome::Failed(JobError::process(
                "transcoder reported success but produced no output file",
                None,
                "",
                "",
            ));
        }

        match self.validate(&request, &output_path).await {
            Ok(()) => JobOutcome::Succeeded(output_path),
            Err(e) => {
                // Never leave a partially-valid artifact under a final name
                remove_rejected(&output_path);
                JobOutcome::Failed(e)
            }
        }
    }

    /// Compare the produced file's measured properties against the request
    /// and the output spec
    async fn validate(&self, request: &ClipRequest, path: &Path) -> Result<(), JobError> {
        let measured = self.inspector.inspect(path).await?;

        if !millis_eq(measured.duration, request.duration()) {
            return Err(mismatch(
                "duration",
                request.duration().to_string(),
                measured.duration.to_string(),
            ));
        }
        if measured.channels != self.spec.channels {
            return Err(mismatch(
                "channels",
                self.spec.channels.to_string(),
                measured.channels.to_string(),
            ));
        }
        if measured.sample_rate != self.spec.sample_rate {
            return Err(mismatch(
                "sample_rate",
                self.spec.sample_rate.to_string(),
                measured.sample_rate.to_string(),
            ));
        }
        if measured.codec != self.spec.codec {
            return Err(mismatch("codec", self.spec.codec.clone(), measured.codec));
        }
        Ok(())
    }
}

fn mismatch(field: &'static str, expected: String, actual: String) -> JobError {
    JobError::Validation {
        field,
        expected,
        actual,
    }
}

fn remove_rejected(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "failed to remove rejected output");
    }
}
