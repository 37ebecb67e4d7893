//! Error types for input decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while decoding input files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    /// Failed to open or read the input file.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of a newline-delimited file is not valid JSON.
    #[error("invalid JSON on line {line} of {path}: {source}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A line of a newline-delimited file parsed, but not to an object.
    #[error("line {line} of {path} is not a JSON object")]
    LineNotAnObject { path: PathBuf, line: usize },

    /// The whole-document input is not valid JSON.
    #[error("invalid JSON document in {path}: {source}")]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The whole-document input parsed, but not to an object or an array of
    /// objects.
    #[error("expected a JSON object or an array of objects in {path}")]
    UnexpectedShape { path: PathBuf },

    /// The delimited file could not be opened or tokenized.
    #[error("failed to read delimited file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A delimited row does not match the column-name count.
    #[error("row at line {line} of {path} has {found} fields, expected {expected}")]
    ColumnMismatch {
        path: PathBuf,
        line: u64,
        found: usize,
        expected: usize,
    },
}

/// Result type for decoding operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::IngestError;
    use std::path::PathBuf;

    #[test]
    fn test_error_display() {
        let err = IngestError::LineNotAnObject {
            path: PathBuf::from("/data/export.json"),
            line: 7,
        };
        assert_eq!(
            err.to_string(),
            "line 7 of /data/export.json is not a JSON object"
        );
    }

    #[test]
    fn test_column_mismatch_display() {
        let err = IngestError::ColumnMismatch {
            path: PathBuf::from("people.csv"),
            line: 3,
            found: 2,
            expected: 4,
        };
        assert_eq!(
            err.to_string(),
            "row at line 3 of people.csv has 2 fields, expected 4"
        );
    }
}
