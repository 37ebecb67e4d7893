//! Streaming decoder for newline-delimited JSON exports.
//!
//! mongoexport and friends write one JSON document per line. The reader
//! yields records lazily so the pipeline can flush batches while the file is
//! still being read; a malformed or non-object line is fatal for the run.

use crate::error::{IngestError, Result};
use esi_model::{Record, as_record};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lazy record reader over a newline-delimited JSON file.
pub struct NdjsonReader {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_number: usize,
}

impl NdjsonReader {
    /// Opens `path` for streaming.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::FileRead`] when the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "streaming newline-delimited JSON");
        Ok(Self {
            path: path.to_path_buf(),
            lines: BufReader::new(file).lines(),
            line_number: 0,
        })
    }

    fn decode(&self, line: std::io::Result<String>) -> Result<Record> {
        let line = line.map_err(|source| IngestError::FileRead {
            path: self.path.clone(),
            source,
        })?;
        let value = serde_json::from_str(&line).map_err(|source| IngestError::MalformedLine {
            path: self.path.clone(),
            line: self.line_number,
            source,
        })?;
        as_record(value).ok_or_else(|| IngestError::LineNotAnObject {
            path: self.path.clone(),
            line: self.line_number,
        })
    }
}

impl Iterator for NdjsonReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        self.line_number += 1;
        Some(self.decode(line))
    }
}
