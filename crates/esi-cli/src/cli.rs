//! CLI argument definitions for elastic-import.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use esi_model::{DEFAULT_BULK_SIZE, DEFAULT_TIMEOUT};

#[derive(Parser)]
#[command(
    name = "elastic-import",
    version,
    about = "Bulk-load JSON, NDJSON, or delimited records into an Elasticsearch index",
    long_about = "Bulk-load structured records into an Elasticsearch-compatible bulk endpoint.\n\n\
                  Reads a JSON document, a newline-delimited JSON export, or delimited text,\n\
                  normalizes each record (extended-JSON wrappers, field removal, transforms,\n\
                  document keys), and submits fixed-size batches to {host}/_bulk.",
    group(ArgGroup::new("encoding").required(true).args(["mongo", "json", "csv"])),
    group(ArgGroup::new("columns").args(["fields", "header_fields"]))
)]
pub struct Cli {
    /// Input file to import.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Target host, with or without a scheme (e.g. localhost:9200).
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Target index name.
    #[arg(value_name = "INDEX")]
    pub index: String,

    /// Target element type.
    #[arg(value_name = "TYPE")]
    pub doc_type: String,

    /// Input is a newline-delimited JSON export (one object per line).
    #[arg(short = 'm', long = "mongo")]
    pub mongo: bool,

    /// Input is a JSON document (an array of objects, or a single object).
    #[arg(short = 'j', long = "json")]
    pub json: bool,

    /// Input is delimited text; requires --fields or --header-fields.
    #[arg(short = 'c', long = "csv", requires = "columns")]
    pub csv: bool,

    /// Records per bulk request.
    #[arg(
        short = 'b',
        long = "bulk-size",
        value_name = "N",
        default_value_t = DEFAULT_BULK_SIZE
    )]
    pub bulk_size: usize,

    /// Request timeout in milliseconds.
    #[arg(
        short = 'T',
        long = "timeout",
        value_name = "MS",
        default_value_t = DEFAULT_TIMEOUT.as_millis() as u64
    )]
    pub timeout: u64,

    /// Comma-separated field paths to remove from every record.
    ///
    /// Paths descend nested objects with dots and arrays with [k] indexes;
    /// one [*]. marker fans the rest of the path out over every array
    /// element (e.g. items[*].token).
    #[arg(
        short = 'i',
        long = "ignore",
        value_name = "PATHS",
        value_delimiter = ','
    )]
    pub ignore: Vec<String>,

    /// Report submission failures and keep going instead of aborting.
    #[arg(short = 'w', long = "warn-errors")]
    pub warn_errors: bool,

    /// JSON file of transform rules applied to every record.
    #[arg(short = 't', long = "transform-file", value_name = "FILE")]
    pub transform_file: Option<PathBuf>,

    /// Comma-separated column names for delimited input.
    #[arg(
        short = 'f',
        long = "fields",
        value_name = "NAMES",
        value_delimiter = ',',
        requires = "csv"
    )]
    pub fields: Vec<String>,

    /// Read column names from the first row of delimited input.
    #[arg(short = 'H', long = "header-fields", requires = "csv")]
    pub header_fields: bool,

    /// Field delimiter for delimited input (single character, or `tab`).
    #[arg(short = 'd', long = "delimiter", value_name = "CHAR", default_value = ",")]
    pub delimiter: String,

    /// Quote character for delimited input (quoting is off when omitted).
    #[arg(long = "quote", value_name = "CHAR")]
    pub quote: Option<String>,

    /// Parse delimited values into numbers and booleans when they round-trip.
    #[arg(short = 'p', long = "parse-values")]
    pub parse_values: bool,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::Cli;

    #[test]
    fn argument_definitions_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn exactly_one_encoding_flag_is_required() {
        let base = ["elastic-import", "data.json", "localhost:9200", "people", "person"];
        assert!(Cli::try_parse_from(base).is_err());

        let mut two = base.to_vec();
        two.extend(["-j", "-m"]);
        assert!(Cli::try_parse_from(two).is_err());

        let mut one = base.to_vec();
        one.push("-j");
        assert!(Cli::try_parse_from(one).is_ok());
    }

    #[test]
    fn csv_requires_a_column_source() {
        let bare = [
            "elastic-import", "data.csv", "localhost:9200", "people", "person", "-c",
        ];
        assert!(Cli::try_parse_from(bare).is_err());

        let with_header = [
            "elastic-import", "data.csv", "localhost:9200", "people", "person", "-c", "-H",
        ];
        assert!(Cli::try_parse_from(with_header).is_ok());

        let with_fields = [
            "elastic-import", "data.csv", "localhost:9200", "people", "person", "-c", "-f", "a,b",
        ];
        let cli = Cli::try_parse_from(with_fields).unwrap();
        assert_eq!(cli.fields, ["a", "b"]);

        let both = [
            "elastic-import", "data.csv", "localhost:9200", "people", "person", "-c", "-H", "-f",
            "a,b",
        ];
        assert!(Cli::try_parse_from(both).is_err());
    }

    #[test]
    fn defaults_match_the_documented_values() {
        let cli = Cli::try_parse_from([
            "elastic-import", "data.json", "localhost:9200", "people", "person", "-j",
        ])
        .unwrap();
        assert_eq!(cli.bulk_size, 1000);
        assert_eq!(cli.timeout, 30_000);
        assert_eq!(cli.delimiter, ",");
        assert_eq!(cli.quote, None);
        assert!(!cli.warn_errors);
        assert!(cli.ignore.is_empty());
    }

    #[test]
    fn ignore_paths_split_on_commas() {
        let cli = Cli::try_parse_from([
            "elastic-import", "data.json", "localhost:9200", "people", "person", "-j", "-i",
            "secret, items[*].token",
        ])
        .unwrap();
        assert_eq!(cli.ignore, ["secret", " items[*].token"]);
    }
}
