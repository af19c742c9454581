//! Manifest reading: comma-separated rows to clip requests
//!
//! One manifest file describes one dataset split. Row 0 is a header and is
//! always skipped; rows whose first field starts with `#` are comments.
//! Data rows carry at least three fields: an opaque per-row identifier
//! (unused here), the video identifier, and the clip start time in decimal
//! seconds. The clip window is always the fixed ten-second one.
//!
//! A malformed data row is fatal for the split — it indicates a corrupt
//! input file rather than an unfetchable clip — so the iterator yields
//! `Err` and the caller stops consuming.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::domain::model::ClipRequest;
use crate::error::ManifestError;

/// Comment marker for skippable rows
const COMMENT_MARKER: char = '#';

/// Minimum number of fields in a data row
const MIN_FIELDS: usize = 3;

/// Lazy, single-pass reader producing [`ClipRequest`]s from one manifest.
///
/// Not restartable: re-open the file for a second pass.
pub struct ManifestReader<R: BufRead> {
    path: PathBuf,
    lines: Lines<R>,
    /// 1-based line number of the next row, for diagnostics
    line: usize,
}

impl ManifestReader<BufReader<File>> {
    /// Open a manifest file on disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| ManifestError::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self::from_reader(BufReader::new(file), path))
    }
}

impl<R: BufRead> ManifestReader<R> {
    /// Wrap an already-open row source; `path` is used for diagnostics only
    pub fn from_reader(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lines: reader.lines(),
            line: 0,
        }
    }

    fn parse_row(&self, row: &str) -> Result<ClipRequest, ManifestError> {
        let fields: Vec<&str> = row.split(',').collect();
        if fields.len() < MIN_FIELDS {
            return Err(self.parse_error(format!(
                "expected at least {MIN_FIELDS} fields, found {}",
                fields.len()
            )));
        }

        let video_id = fields[1].trim();
        let start: f64 = fields[2]
            .trim()
            .parse()
            .map_err(|_| self.parse_error(format!("invalid start time {:?}", fields[2].trim())))?;

        ClipRequest::new(video_id, start).map_err(|e| self.parse_error(e.to_string()))
    }

    fn parse_error(&self, reason: String) -> ManifestError {
        ManifestError::Parse {
            path: self.path.clone(),
            line: self.line,
            reason,
        }
    }
}

impl<R: BufRead> Iterator for ManifestReader<R> {
    type Item = Result<ClipRequest, ManifestError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = match self.lines.next()? {
                Ok(row) => row,
                Err(source) => {
                    return Some(Err(ManifestError::Read {
                        path: self.path.clone(),
                        line: self.line + 1,
                        source,
                    }))
                }
            };
            self.line += 1;

            // Header row, comment rows and blank lines are silently skipped
            if self.line == 1 || row.trim().is_empty() {
                continue;
            }
            if row.trim_start().starts_with(COMMENT_MARKER) {
                continue;
            }

            return Some(self.parse_row(&row));
        }
    }
}
