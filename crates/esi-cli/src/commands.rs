//! Resolves parsed arguments into a validated run and executes it.

use std::fs;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, ensure};
use tracing::info;

use esi_cli::pipeline::{ImportResult, run_import};
use esi_ingest::delimited::{self, ColumnSource, DelimitedOptions};
use esi_ingest::{NdjsonReader, json};
use esi_model::{ErrorPolicy, FieldPath, RunOptions, TransformSpec};
use esi_submit::BulkClient;

use crate::cli::Cli;

pub fn run_import_command(cli: &Cli) -> Result<ImportResult> {
    let options = build_options(cli)?;
    let client = BulkClient::new(&options).context("build HTTP client")?;
    info!(
        file = %cli.file.display(),
        endpoint = client.endpoint(),
        bulk_size = options.bulk_size,
        "starting import"
    );
    let start = Instant::now();
    let result = if cli.mongo {
        let records = NdjsonReader::open(&cli.file)?;
        run_import(&options, &client, records)?
    } else if cli.csv {
        let records = delimited::read_records(&cli.file, &delimited_options(cli)?)?;
        run_import(&options, &client, records.into_iter().map(Ok))?
    } else {
        let records = json::read_records(&cli.file)?;
        run_import(&options, &client, records.into_iter().map(Ok))?
    };
    info!(
        batches = result.batches,
        records = result.records,
        failed = result.failed,
        duration_ms = start.elapsed().as_millis(),
        "import finished"
    );
    Ok(result)
}

/// Resolves CLI flags into validated run options. Everything here fails
/// before the first record is read, let alone submitted.
fn build_options(cli: &Cli) -> Result<RunOptions> {
    ensure!(
        cli.file.is_file(),
        "input file not found: {}",
        cli.file.display()
    );
    let mut ignore_paths = Vec::new();
    for expr in &cli.ignore {
        let expr = expr.trim();
        if expr.is_empty() {
            continue;
        }
        ignore_paths.push(FieldPath::parse(expr)?);
    }
    let mut options = RunOptions::new(&cli.host, &cli.index, &cli.doc_type)
        .with_bulk_size(cli.bulk_size)
        .with_timeout(Duration::from_millis(cli.timeout))
        .with_ignore_paths(ignore_paths)
        .with_error_policy(if cli.warn_errors {
            ErrorPolicy::WarnAndContinue
        } else {
            ErrorPolicy::Abort
        });
    if let Some(path) = &cli.transform_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read transform file {}", path.display()))?;
        let transform = TransformSpec::from_json(&text)
            .with_context(|| format!("parse transform file {}", path.display()))?;
        options = options.with_transform(Some(transform));
    }
    options.validate()?;
    Ok(options)
}

fn delimited_options(cli: &Cli) -> Result<DelimitedOptions> {
    let delimiter = delimited::parse_delimiter(&cli.delimiter)?;
    let quote = match &cli.quote {
        Some(raw) => delimited::parse_quote(raw)?,
        None => None,
    };
    let columns = if cli.header_fields {
        ColumnSource::HeaderRow
    } else {
        let names: Vec<String> = cli
            .fields
            .iter()
            .map(|name| name.trim().to_owned())
            .collect();
        ensure!(
            !names.iter().any(String::is_empty),
            "column names must not be empty"
        );
        ColumnSource::Names(names)
    };
    Ok(DelimitedOptions {
        delimiter,
        quote,
        columns,
        parse_values: cli.parse_values,
    })
}
