//! Post-hoc file inspection via ffprobe
//!
//! ffprobe's JSON dump is parsed for the first audio stream plus the
//! container duration. Any file ffprobe cannot read counts as a validation
//! failure — an unreadable output is as wrong as a mismatched one.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::error::JobError;
use crate::ports::{AudioProperties, MediaInspector};

/// ffprobe JSON output, reduced to the fields the inspector reads
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    channels: Option<u32>,
    sample_rate: Option<String>,
    duration: Option<String>,
}

/// [`MediaInspector`] backed by the ffprobe command-line tool
#[derive(Debug, Default)]
pub struct FfprobeInspector;

impl FfprobeInspector {
    pub fn new() -> Self {
        Self
    }
}

fn unreadable(detail: impl std::fmt::Display) -> JobError {
    JobError::Validation {
        field: "probe",
        expected: "readable audio file".to_string(),
        actual: detail.to_string(),
    }
}

#[async_trait]
impl MediaInspector for FfprobeInspector {
    async fn inspect(&self, path: &Path) -> Result<AudioProperties, JobError> {
        which::which("ffprobe").map_err(|_| unreadable("ffprobe not found in PATH"))?;

        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| unreadable(format!("failed to spawn ffprobe: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(unreadable(
                stderr.lines().last().unwrap_or("ffprobe failed"),
            ));
        }

        let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| unreadable(format!("unparsable ffprobe output: {e}")))?;

        let stream = probe
            .streams
            .iter()
            .find(|s| s.codec_type == "audio")
            .ok_or_else(|| unreadable("no audio stream found"))?;

        let duration = probe
            .format
            .duration
            .as_deref()
            .or(stream.duration.as_deref())
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| unreadable("no duration reported"))?;

        let channels = stream
            .channels
            .ok_or_else(|| unreadable("no channel count reported"))?;

        let sample_rate = stream
            .sample_rate
            .as_deref()
            .and_then(|r| r.parse::<u32>().ok())
            .ok_or_else(|| unreadable("no sample rate reported"))?;

        let codec = stream
            .codec_name
            .clone()
            .ok_or_else(|| unreadable("no codec reported"))?;

        Ok(AudioProperties {
            duration,
            channels,
            sample_rate,
            codec,
        })
    }
}
