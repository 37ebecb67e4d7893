//! Batch-by-batch import driver.
//!
//! Records come in as a fallible iterator so line-oriented sources stream
//! end-to-end: nothing beyond the batch in flight is ever buffered, and a
//! batch is only pulled from the input after the previous one has been
//! submitted and judged against the error policy.

use anyhow::Result;
use tracing::{error, info, info_span, warn};

use esi_model::{ErrorPolicy, Record, RunOptions};
use esi_submit::{BatchReport, BulkClient, IndexInstruction, Normalizer, batched};

/// Aggregate outcome of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    /// Batches submitted, including a failing final one.
    pub batches: usize,
    /// Records submitted across all batches.
    pub records: usize,
    /// Records rejected by the backend or lost to failed bulk requests.
    pub failed: usize,
    /// True when the abort policy stopped the run before the input ran out.
    pub aborted: bool,
}

impl ImportResult {
    /// Records the backend accepted.
    pub fn succeeded(&self) -> usize {
        self.records.saturating_sub(self.failed)
    }
}

/// Drives records from a decoder through normalization, batching, and
/// submission until the input is exhausted or the error policy stops the run.
///
/// Decode and transform errors are fatal and surface immediately, before the
/// affected batch is submitted; submission failures instead go through the
/// abort/warn policy. Already-submitted batches stay committed either way.
pub fn run_import<I>(options: &RunOptions, client: &BulkClient, records: I) -> Result<ImportResult>
where
    I: IntoIterator<Item = esi_ingest::Result<Record>>,
{
    let normalizer = Normalizer::new(options);
    let instructions = records.into_iter().map(|record| {
        record
            .map_err(anyhow::Error::from)
            .and_then(|record| normalizer.normalize(record).map_err(Into::into))
    });

    let mut result = ImportResult::default();
    for (index, batch) in batched(instructions, options.bulk_size)?.enumerate() {
        let batch = batch
            .into_iter()
            .collect::<Result<Vec<IndexInstruction>>>()?;
        let span = info_span!("batch", number = index + 1, records = batch.len());
        let _guard = span.enter();

        result.batches += 1;
        result.records += batch.len();

        match client.submit(&batch) {
            Ok(response) => {
                let report = BatchReport::from_response(batch.len(), &response);
                for failure in &report.failures {
                    warn!(
                        id = failure.id.as_deref().unwrap_or("-"),
                        status = failure.status,
                        kind = %failure.kind,
                        reason = %failure.reason,
                        caused_by = failure.caused_by.as_deref().unwrap_or("-"),
                        "instruction rejected"
                    );
                }
                result.failed += report.failures.len();
                if !report.has_failures() {
                    info!(
                        accepted = report.succeeded(),
                        took_ms = response.took,
                        "batch accepted"
                    );
                } else if options.error_policy == ErrorPolicy::Abort {
                    error!(
                        failures = report.failures.len(),
                        "aborting import after rejected instructions"
                    );
                    result.aborted = true;
                    break;
                } else {
                    warn!(
                        accepted = report.succeeded(),
                        failures = report.failures.len(),
                        "batch completed with rejections"
                    );
                }
            }
            Err(submit_error) => {
                result.failed += batch.len();
                if options.error_policy == ErrorPolicy::Abort {
                    error!(error = %submit_error, "aborting import after failed bulk request");
                    result.aborted = true;
                    break;
                }
                warn!(
                    error = %submit_error,
                    lost = batch.len(),
                    "bulk request failed; continuing"
                );
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::ImportResult;

    #[test]
    fn succeeded_never_underflows() {
        let result = ImportResult {
            batches: 1,
            records: 2,
            failed: 5,
            aborted: true,
        };
        assert_eq!(result.succeeded(), 0);
    }
}
