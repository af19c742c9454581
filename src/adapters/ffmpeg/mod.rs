//! Clip transcoding via the ffmpeg command-line tool
//!
//! The invocation mirrors the dataset's canonical extraction command: seek
//! into the remote stream, take the window's duration, drop video, and
//! encode to the target spec. `-n` refuses to overwrite an existing output;
//! the pipeline has already checked for one, so hitting it would mean a
//! lost race with a duplicate manifest row, which is fine either way.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::model::{ClipRequest, OutputSpec};
use crate::error::JobError;
use crate::ports::{ResolvedSource, Transcoder};

/// Default bound on the initial stream-fetch stage, in microseconds
pub const DEFAULT_FETCH_TIMEOUT_US: u64 = 5_000_000;

/// [`Transcoder`] backed by the ffmpeg command-line tool
#[derive(Debug)]
pub struct FfmpegTranscoder {
    /// `-timeout` for the network input, microseconds
    fetch_timeout_us: u64,
}

impl FfmpegTranscoder {
    pub fn new(fetch_timeout_us: u64) -> Self {
        Self { fetch_timeout_us }
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT_US)
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        source: &ResolvedSource,
        request: &ClipRequest,
        spec: &OutputSpec,
        output: &Path,
    ) -> Result<(), JobError> {
        which::which("ffmpeg")
            .map_err(|_| JobError::process("ffmpeg not found in PATH", None, "", ""))?;

        let args = [
            "-hide_banner".to_string(),
            "-timeout".to_string(),
            self.fetch_timeout_us.to_string(),
            "-i".to_string(),
            source.media_url.clone(),
            "-n".to_string(),
            "-ss".to_string(),
            format!("{:.3}", request.start),
            "-t".to_string(),
            format!("{:.3}", request.duration()),
            "-ar".to_string(),
            spec.sample_rate.to_string(),
            "-vn".to_string(),
            "-ac".to_string(),
            spec.channels.to_string(),
            "-sample_fmt".to_string(),
            spec.bit_depth.clone(),
            "-f".to_string(),
            spec.format.clone(),
            "-acodec".to_string(),
            spec.codec.clone(),
            output.to_string_lossy().to_string(),
        ];
        debug!(id = %request.video_id, "running ffmpeg {}", args.join(" "));

        let captured = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| JobError::process(format!("failed to spawn ffmpeg: {e}"), None, "", ""))?;

        if !captured.status.success() {
            return Err(JobError::process(
                "ffmpeg exited with non-zero status",
                captured.status.code(),
                String::from_utf8_lossy(&captured.stdout),
                String::from_utf8_lossy(&captured.stderr),
            ));
        }

        Ok(())
    }
}
