//! Ports - trait seams for the external collaborators
//!
//! The pipeline only ever talks to the resolver, transcoder and inspector
//! through these traits; production adapters live in `crate::adapters` and
//! tests substitute stubs.

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::model::{ClipRequest, OutputSpec};
use crate::error::JobError;

/// What resolving a video identifier yields: the source's total duration and
/// a fetchable locator for its best audio stream.
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    /// Direct media stream URL, consumable by the transcoder
    pub media_url: String,
    /// Total duration of the source video in seconds
    pub duration: f64,
}

/// Port for turning a video identifier into a fetchable media stream
#[async_trait]
pub trait SourceResolver: Send + Sync {
    /// Resolve a video identifier.
    ///
    /// Fails with [`JobError::Resolution`] when the video is unavailable or
    /// restricted.
    async fn resolve(&self, video_id: &str) -> Result<ResolvedSource, JobError>;
}

/// Port for extracting and transcoding one clip window to a file on disk
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Transcode `request`'s (already clamped) window from `source` into
    /// `output`, in the format described by `spec`.
    ///
    /// Fails with [`JobError::Process`] carrying the exit code and captured
    /// output. A missing output file after a clean exit is detected by the
    /// pipeline, not here.
    async fn transcode(
        &self,
        source: &ResolvedSource,
        request: &ClipRequest,
        spec: &OutputSpec,
        output: &Path,
    ) -> Result<(), JobError>;
}

/// Measured properties of an audio file on disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioProperties {
    /// Duration in seconds
    pub duration: f64,
    pub channels: u32,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Codec identifier as reported by the inspector
    pub codec: String,
}

/// Port for post-hoc inspection of produced files
#[async_trait]
pub trait MediaInspector: Send + Sync {
    /// Measure the audio properties of `path`.
    ///
    /// An unreadable or undecodable file fails with
    /// [`JobError::Validation`]; the pipeline treats that the same as a
    /// property mismatch.
    async fn inspect(&self, path: &Path) -> Result<AudioProperties, JobError>;
}
