//! Optional TOML configuration file
//!
//! Everything has a built-in default; the file only overrides. CLI flags in
//! turn override the file.
//!
//! ```toml
//! jobs = 4
//! fetch_timeout_us = 10000000
//!
//! [output]
//! format = "wav"
//! channels = 2
//! sample_rate = 48000
//! bit_depth = "s16"
//! codec = "pcm_s16le"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::domain::model::OutputSpec;
use crate::error::ConfigError;

/// Contents of the config file; absent keys fall back to defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Number of concurrent clip jobs
    pub jobs: Option<usize>,
    /// Bound on the transcoder's initial stream-fetch stage, microseconds
    pub fetch_timeout_us: Option<u64>,
    /// Target audio format for every clip
    pub output: Option<OutputSpec>,
}

impl FileConfig {
    /// Load and parse a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
