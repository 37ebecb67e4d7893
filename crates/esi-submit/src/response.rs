//! Bulk response decoding and per-item failure classification.
//!
//! The backend acknowledges every instruction individually, so a `200 OK`
//! response can still carry rejected items. Everything here is tolerant of
//! missing fields: older backends omit `took`, some omit per-item statuses,
//! and unknown item shapes are ignored rather than treated as failures.

use serde::Deserialize;

/// Decoded `_bulk` response payload.
#[derive(Debug, Deserialize)]
pub struct BulkResponse {
    /// Server-side processing time in milliseconds.
    #[serde(default)]
    pub took: Option<u64>,
    /// True when at least one item was rejected.
    #[serde(default)]
    pub errors: bool,
    /// Per-instruction acknowledgements, in submission order.
    #[serde(default)]
    pub items: Vec<BulkItem>,
}

/// One per-instruction acknowledgement. The backend nests the outcome under
/// the action name, so both `index` and `create` forms are accepted.
#[derive(Debug, Deserialize)]
pub struct BulkItem {
    index: Option<ItemOutcome>,
    create: Option<ItemOutcome>,
}

impl BulkItem {
    fn outcome(&self) -> Option<&ItemOutcome> {
        self.index.as_ref().or(self.create.as_ref())
    }

    fn failure(&self) -> Option<ItemFailure> {
        let outcome = self.outcome()?;
        let accepted = outcome.error.is_none()
            && outcome.status.is_none_or(|status| (200..300).contains(&status));
        if accepted {
            return None;
        }
        let error = outcome.error.as_ref();
        Some(ItemFailure {
            id: outcome.id.clone(),
            status: outcome.status.unwrap_or(0),
            kind: error
                .and_then(|error| error.kind.clone())
                .unwrap_or_else(|| "unknown".to_owned()),
            reason: error
                .and_then(|error| error.reason.clone())
                .unwrap_or_else(|| "unknown".to_owned()),
            caused_by: error
                .and_then(|error| error.caused_by.as_ref())
                .and_then(|cause| cause.reason.clone()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ItemOutcome {
    #[serde(rename = "_id")]
    id: Option<String>,
    status: Option<u16>,
    error: Option<ItemError>,
}

#[derive(Debug, Deserialize)]
struct ItemError {
    #[serde(rename = "type")]
    kind: Option<String>,
    reason: Option<String>,
    caused_by: Option<CausedBy>,
}

#[derive(Debug, Deserialize)]
struct CausedBy {
    reason: Option<String>,
}

/// One rejected instruction out of a bulk response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Document key the backend echoed back, when present.
    pub id: Option<String>,
    /// Per-item status code, zero when the backend omitted it.
    pub status: u16,
    /// Error type reported by the backend.
    pub kind: String,
    /// Human-readable rejection reason.
    pub reason: String,
    /// Root-cause reason, when the backend nests one.
    pub caused_by: Option<String>,
}

/// Outcome of one submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Instructions submitted in the batch.
    pub submitted: usize,
    /// Rejected instructions, in submission order.
    pub failures: Vec<ItemFailure>,
}

impl BatchReport {
    /// Classifies a decoded response against the submitted batch size.
    pub fn from_response(submitted: usize, response: &BulkResponse) -> Self {
        // The errors flag is authoritative: when it is clear, every item was
        // accepted and the per-item scan can be skipped.
        let failures = if response.errors {
            response.items.iter().filter_map(BulkItem::failure).collect()
        } else {
            Vec::new()
        };
        Self {
            submitted,
            failures,
        }
    }

    /// Instructions the backend accepted.
    pub fn succeeded(&self) -> usize {
        self.submitted.saturating_sub(self.failures.len())
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
