//! Blocking HTTP client for the bulk endpoint.

use esi_model::RunOptions;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::bulk::{IndexInstruction, encode_body};
use crate::error::{Result, SubmitError};
use crate::response::BulkResponse;

/// Content type the bulk endpoint requires for action/document bodies.
const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Scheme prepended when the configured host omits one.
const DEFAULT_SCHEME: &str = "http";

/// Characters of a rejection body echoed into error messages.
const BODY_EXCERPT_LIMIT: usize = 200;

/// Blocking client bound to one bulk endpoint.
pub struct BulkClient {
    http: Client,
    endpoint: String,
}

impl BulkClient {
    /// Builds a client from the run options, applying the configured timeout
    /// to every request.
    pub fn new(options: &RunOptions) -> Result<Self> {
        let http = Client::builder().timeout(options.timeout).build()?;
        Ok(Self {
            http,
            endpoint: bulk_endpoint(&options.host),
        })
    }

    /// URL every batch posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Encodes and submits one batch, blocking until the backend responds or
    /// the timeout elapses.
    pub fn submit(&self, batch: &[IndexInstruction]) -> Result<BulkResponse> {
        let body = encode_body(batch)?;
        debug!(
            endpoint = %self.endpoint,
            instructions = batch.len(),
            bytes = body.len(),
            "submitting bulk request"
        );
        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, NDJSON_CONTENT_TYPE)
            .body(body)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SubmitError::Endpoint {
                status,
                body: excerpt(&body),
            });
        }
        Ok(response.json()?)
    }
}

/// Normalizes a user-supplied host into the bulk endpoint URL. A scheme is
/// prepended when missing and a single `/_bulk` suffix appended.
fn bulk_endpoint(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        format!("{host}/_bulk")
    } else {
        format!("{DEFAULT_SCHEME}://{host}/_bulk")
    }
}

/// First [`BODY_EXCERPT_LIMIT`] characters of a rejection body, cut on a
/// character boundary.
fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_EXCERPT_LIMIT) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_a_scheme_when_missing() {
        assert_eq!(
            bulk_endpoint("localhost:9200"),
            "http://localhost:9200/_bulk"
        );
        assert_eq!(
            bulk_endpoint(" 10.0.0.7:9200/ "),
            "http://10.0.0.7:9200/_bulk"
        );
        assert_eq!(
            bulk_endpoint("https://search.example.com"),
            "https://search.example.com/_bulk"
        );
    }

    #[test]
    fn excerpts_long_bodies_on_character_boundaries() {
        let body = "é".repeat(300);
        let cut = excerpt(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), BODY_EXCERPT_LIMIT + 3);
        assert_eq!(excerpt("  short  "), "short");
    }
}
