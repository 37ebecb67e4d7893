//! Whole-document JSON decoder.

use crate::error::{IngestError, Result};
use esi_model::{Record, as_record};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads `path` as one JSON document holding either a single record or an
/// array of records. The whole file is decoded into memory before batching.
///
/// # Errors
///
/// Fails on I/O errors, invalid JSON, or any shape other than an object or
/// an array of objects.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value =
        serde_json::from_str(&text).map_err(|source| IngestError::MalformedDocument {
            path: path.to_path_buf(),
            source,
        })?;
    let records = match value {
        Value::Object(map) => vec![map],
        Value::Array(elements) => elements
            .into_iter()
            .map(|element| {
                as_record(element).ok_or_else(|| IngestError::UnexpectedShape {
                    path: path.to_path_buf(),
                })
            })
            .collect::<Result<_>>()?,
        _ => {
            return Err(IngestError::UnexpectedShape {
                path: path.to_path_buf(),
            });
        }
    };
    debug!(path = %path.display(), records = records.len(), "decoded JSON document");
    Ok(records)
}
