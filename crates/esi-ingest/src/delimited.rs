//! Delimited-text decoder built on the `csv` crate.
//!
//! Explicit single-byte delimiter (with a `tab` alias), quoting disabled
//! unless a quote character is configured, column names from a configured
//! list or the first row, and raw string values unless value parsing is
//! requested.

use crate::error::IngestError;
use esi_model::{ConfigError, Record};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Where column names come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    /// An explicit ordered list of names; every row is data.
    Names(Vec<String>),
    /// The first row of the file names the columns.
    HeaderRow,
}

/// Decoder configuration.
#[derive(Debug, Clone)]
pub struct DelimitedOptions {
    /// Field separator.
    pub delimiter: u8,
    /// Quote character; `None` disables quoting entirely.
    pub quote: Option<u8>,
    /// Source of column names.
    pub columns: ColumnSource,
    /// Coerce integers, floats, and booleans instead of keeping raw strings.
    pub parse_values: bool,
}

impl DelimitedOptions {
    /// Options with the importer defaults: comma-separated, quoting off,
    /// raw string values.
    #[must_use]
    pub fn new(columns: ColumnSource) -> Self {
        Self {
            delimiter: b',',
            quote: None,
            columns,
            parse_values: false,
        }
    }
}

/// Resolves the delimiter option: one literal character, or the alias `tab`.
///
/// # Errors
///
/// Anything longer than one byte (other than the alias) is a configuration
/// error.
pub fn parse_delimiter(raw: &str) -> std::result::Result<u8, ConfigError> {
    if raw == "tab" {
        return Ok(b'\t');
    }
    match raw.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(ConfigError::InvalidDelimiter {
            value: raw.to_owned(),
        }),
    }
}

/// Resolves the quote option. An empty string keeps quoting disabled.
///
/// # Errors
///
/// Anything longer than one byte is a configuration error.
pub fn parse_quote(raw: &str) -> std::result::Result<Option<u8>, ConfigError> {
    match raw.as_bytes() {
        [] => Ok(None),
        [byte] => Ok(Some(*byte)),
        _ => Err(ConfigError::InvalidQuote {
            value: raw.to_owned(),
        }),
    }
}

/// Decodes the whole file into records. Rows whose field count differs from
/// the column-name count are decode errors; empty lines are skipped.
///
/// # Errors
///
/// Fails on I/O errors, tokenizer errors, and column-count mismatches.
pub fn read_records(
    path: &Path,
    options: &DelimitedOptions,
) -> std::result::Result<Vec<Record>, IngestError> {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(options.delimiter)
        .flexible(true);
    match options.quote {
        Some(quote) => {
            builder.quote(quote);
        }
        None => {
            builder.quoting(false);
        }
    }
    let mut reader = builder.from_path(path).map_err(|source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    let mut names: Option<Vec<String>> = match &options.columns {
        ColumnSource::Names(list) => Some(list.clone()),
        ColumnSource::HeaderRow => None,
    };
    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        match &mut names {
            None => names = Some(header_names(&row)),
            Some(names) => {
                if row.len() != names.len() {
                    let line = row.position().map_or(index as u64 + 1, csv::Position::line);
                    return Err(IngestError::ColumnMismatch {
                        path: path.to_path_buf(),
                        line,
                        found: row.len(),
                        expected: names.len(),
                    });
                }
                let mut record = Record::new();
                for (name, cell) in names.iter().zip(row.iter()) {
                    record.insert(name.clone(), cell_value(cell, options.parse_values));
                }
                records.push(record);
            }
        }
    }
    debug!(path = %path.display(), records = records.len(), "decoded delimited file");
    Ok(records)
}

/// Column names from a header row: cells are trimmed and a UTF-8 BOM on the
/// first cell is stripped.
fn header_names(row: &csv::StringRecord) -> Vec<String> {
    row.iter()
        .enumerate()
        .map(|(index, cell)| {
            let cell = if index == 0 {
                cell.trim_start_matches('\u{feff}')
            } else {
                cell
            };
            cell.trim().to_owned()
        })
        .collect()
}

fn cell_value(cell: &str, parse_values: bool) -> Value {
    if parse_values {
        coerce(cell)
    } else {
        Value::String(cell.to_owned())
    }
}

/// Best-effort scalar coercion for `--parse-values`: booleans and numbers
/// that round-trip cleanly become typed values, everything else (including
/// empty cells) stays a string.
fn coerce(cell: &str) -> Value {
    match cell {
        "" => return Value::String(String::new()),
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(int) = cell.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Ok(float) = cell.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(float) {
            return Value::Number(number);
        }
    }
    Value::String(cell.to_owned())
}

#[cfg(test)]
mod tests {
    use super::{coerce, parse_delimiter, parse_quote};
    use serde_json::json;

    #[test]
    fn test_delimiter_aliases() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert!(parse_delimiter("||").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn test_quote_parsing() {
        assert_eq!(parse_quote("").unwrap(), None);
        assert_eq!(parse_quote("\"").unwrap(), Some(b'"'));
        assert!(parse_quote("''").is_err());
    }

    #[test]
    fn test_value_coercion() {
        assert_eq!(coerce("42"), json!(42));
        assert_eq!(coerce("-7"), json!(-7));
        assert_eq!(coerce("3.25"), json!(3.25));
        assert_eq!(coerce("true"), json!(true));
        assert_eq!(coerce("false"), json!(false));
        assert_eq!(coerce(""), json!(""));
        assert_eq!(coerce("NULL"), json!("NULL"));
        assert_eq!(coerce(" 5"), json!(" 5"));
    }
}
