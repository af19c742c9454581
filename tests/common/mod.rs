//! Stub collaborators for pipeline and pool tests
//!
//! Each stub counts its invocations so tests can assert, for example, that
//! an idempotent skip never reached the transcoder.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use audiofetch::domain::model::OutputSpec;
use audiofetch::error::JobError;
use audiofetch::pipeline::ClipPipeline;
use audiofetch::ports::{
    AudioProperties, MediaInspector, ResolvedSource, SourceResolver, Transcoder,
};

/// Resolver reporting one fixed source duration, failing for selected ids
pub struct StubResolver {
    duration: f64,
    fail_ids: HashSet<String>,
    calls: AtomicUsize,
}

impl StubResolver {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            fail_ids: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_for(mut self, video_id: &str) -> Self {
        self.fail_ids.insert(video_id.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceResolver for StubResolver {
    async fn resolve(&self, video_id: &str) -> Result<ResolvedSource, JobError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_ids.contains(video_id) {
            return Err(JobError::Resolution(format!("{video_id} is unavailable")));
        }
        Ok(ResolvedSource {
            media_url: format!("https://media.invalid/{video_id}"),
            duration: self.duration,
        })
    }
}

/// Transcoder writing a placeholder file, or failing to, on demand
pub struct StubTranscoder {
    write_output: bool,
    exit_code: Option<i32>,
    calls: AtomicUsize,
}

impl StubTranscoder {
    /// Writes a placeholder output file and reports success
    pub fn ok() -> Self {
        Self {
            write_output: true,
            exit_code: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Reports success without creating any file
    pub fn silent() -> Self {
        Self {
            write_output: false,
            exit_code: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails with the given exit code
    pub fn failing(exit_code: i32) -> Self {
        Self {
            write_output: false,
            exit_code: Some(exit_code),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcoder for StubTranscoder {
    async fn transcode(
        &self,
        _source: &ResolvedSource,
        _request: &audiofetch::ClipRequest,
        _spec: &OutputSpec,
        output: &Path,
    ) -> Result<(), JobError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(code) = self.exit_code {
            return Err(JobError::process(
                "ffmpeg exited with non-zero status",
                Some(code),
                "",
                "stub transcoder failure",
            ));
        }
        if self.write_output {
            std::fs::write(output, b"RIFF").expect("stub output write");
        }
        Ok(())
    }
}

/// Inspector reporting fixed measured properties
pub struct StubInspector {
    properties: AudioProperties,
}

impl StubInspector {
    /// Properties matching `spec` with the given measured duration
    pub fn matching(spec: &OutputSpec, duration: f64) -> Self {
        Self {
            properties: AudioProperties {
                duration,
                channels: spec.channels,
                sample_rate: spec.sample_rate,
                codec: spec.codec.clone(),
            },
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.properties.duration = duration;
        self
    }

    pub fn with_channels(mut self, channels: u32) -> Self {
        self.properties.channels = channels;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.properties.sample_rate = sample_rate;
        self
    }

    pub fn with_codec(mut self, codec: &str) -> Self {
        self.properties.codec = codec.to_string();
        self
    }
}

#[async_trait]
impl MediaInspector for StubInspector {
    async fn inspect(&self, _path: &Path) -> Result<AudioProperties, JobError> {
        Ok(self.properties.clone())
    }
}

/// Wire a pipeline from stub collaborators and the default spec
pub fn stub_pipeline(
    resolver: Arc<StubResolver>,
    transcoder: Arc<StubTranscoder>,
    inspector: Arc<StubInspector>,
) -> ClipPipeline {
    ClipPipeline::new(resolver, transcoder, inspector, OutputSpec::default())
}
