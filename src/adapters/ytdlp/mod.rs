//! Source resolution via yt-dlp
//!
//! `yt-dlp -j` is asked for the metadata dump of the video page, without
//! downloading anything. With a single-format selector the dump carries the
//! chosen stream's direct URL at the top level, next to the video duration.

use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::error::JobError;
use crate::ports::{ResolvedSource, SourceResolver};

/// Page URL template the identifier is substituted into
const VIDEO_PAGE_URL: &str = "https://www.youtube.com/watch?v=";

/// Format selector: best audio-only stream, falling back to best overall
const FORMAT_SELECTOR: &str = "bestaudio/best";

/// Fields of the yt-dlp JSON dump the resolver cares about
#[derive(Debug, Deserialize)]
struct InfoDump {
    duration: Option<f64>,
    url: Option<String>,
}

/// [`SourceResolver`] backed by the yt-dlp command-line tool
#[derive(Debug, Default)]
pub struct YtDlpResolver;

impl YtDlpResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SourceResolver for YtDlpResolver {
    async fn resolve(&self, video_id: &str) -> Result<ResolvedSource, JobError> {
        which::which("yt-dlp")
            .map_err(|_| JobError::Resolution("yt-dlp not found in PATH".to_string()))?;

        let page_url = format!("{VIDEO_PAGE_URL}{video_id}");
        debug!(url = %page_url, "resolving source via yt-dlp");

        let output = Command::new("yt-dlp")
            .args(["-j", "--no-playlist", "-f", FORMAT_SELECTOR])
            .arg(&page_url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| JobError::Resolution(format!("failed to spawn yt-dlp: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr.lines().last().unwrap_or("unknown error");
            return Err(JobError::Resolution(format!("yt-dlp failed: {reason}")));
        }

        let info: InfoDump = serde_json::from_slice(&output.stdout)
            .map_err(|e| JobError::Resolution(format!("unparsable yt-dlp output: {e}")))?;

        let duration = info
            .duration
            .ok_or_else(|| JobError::Resolution("source reported no duration".to_string()))?;
        let media_url = info
            .url
            .ok_or_else(|| JobError::Resolution("source reported no stream URL".to_string()))?;

        Ok(ResolvedSource {
            media_url,
            duration,
        })
    }
}
