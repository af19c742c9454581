//! Core data model: clip requests, output spec and job outcomes

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{JobError, RequestError};

/// Length of the fixed clip window appended to each manifest start time
pub const DEFAULT_WINDOW_SECS: f64 = 10.0;

/// One validated unit of work: a clip window against a single video.
///
/// Immutable once constructed, except that the pipeline clamps `end` on its
/// own copy against the source's reported duration. The clamp is never
/// persisted back to the manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRequest {
    pub video_id: String,
    /// Window start in seconds
    pub start: f64,
    /// Window end in seconds, exclusive
    pub end: f64,
}

impl ClipRequest {
    /// Create a request with the fixed default window
    pub fn new(video_id: impl Into<String>, start: f64) -> Result<Self, RequestError> {
        Self::with_window(video_id, start, start + DEFAULT_WINDOW_SECS)
    }

    /// Create a request with an explicit window
    pub fn with_window(
        video_id: impl Into<String>,
        start: f64,
        end: f64,
    ) -> Result<Self, RequestError> {
        let video_id = video_id.into();
        if video_id.is_empty() {
            return Err(RequestError::EmptyId);
        }
        if start < 0.0 {
            return Err(RequestError::NegativeStart(start));
        }
        if end <= start {
            return Err(RequestError::EmptyWindow { start, end });
        }
        Ok(Self {
            video_id,
            start,
            end,
        })
    }

    /// Requested clip duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Clamp the window end to the source's reported total duration
    pub fn clamp_end(&mut self, source_duration: f64) {
        if self.end > source_duration {
            self.end = source_duration;
        }
    }

    /// Deterministic output file name for this window and format.
    ///
    /// `{video_id}_{start_ms}_{end_ms}.{format}`, with the bounds truncated
    /// to integer milliseconds. Two distinct requests never collide unless
    /// they denote the same clip.
    pub fn file_name(&self, spec: &OutputSpec) -> String {
        format!(
            "{}_{}_{}.{}",
            self.video_id,
            to_millis(self.start),
            to_millis(self.end),
            spec.format
        )
    }
}

/// Truncate seconds to integer milliseconds
fn to_millis(seconds: f64) -> u64 {
    (seconds * 1000.0) as u64
}

/// Target audio format for every clip in the batch.
///
/// A single immutable value is passed into the pipeline; nothing in the
/// process mutates it after startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSpec {
    /// Container/format tag handed to the transcoder (`-f`) and used as the
    /// output file extension
    pub format: String,
    pub channels: u32,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Sample format tag handed to the transcoder (`-sample_fmt`)
    pub bit_depth: String,
    /// Codec identifier handed to the transcoder and expected back from the
    /// media inspector
    pub codec: String,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            format: "wav".to_string(),
            channels: 2,
            sample_rate: 48_000,
            bit_depth: "s16".to_string(),
            codec: "pcm_s16le".to_string(),
        }
    }
}

/// Terminal state of one clip job. Produced exactly once per request.
#[derive(Debug)]
pub enum JobOutcome {
    /// Output file already existed; nothing was invoked
    Skipped(PathBuf),
    /// Clip was transcoded and passed validation
    Succeeded(PathBuf),
    /// Job failed; the batch continues
    Failed(JobError),
}
