//! Error types for bulk submission.

use thiserror::Error;

/// Errors that can occur while encoding or submitting a batch.
///
/// Per-item failures inside an accepted bulk response are not errors at this
/// level; they are classified into [`crate::response::BatchReport`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    /// The bulk request failed at the transport level (connect failure,
    /// timeout, or an undecodable response).
    #[error("Bulk request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The bulk endpoint answered with a non-success status.
    #[error("Bulk endpoint returned {status}: {body}")]
    Endpoint {
        /// HTTP status of the response.
        status: reqwest::StatusCode,
        /// Response body, trimmed for display.
        body: String,
    },

    /// A record could not be serialized into the bulk payload.
    #[error("Failed to encode bulk payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for submission operations.
pub type Result<T> = std::result::Result<T, SubmitError>;
