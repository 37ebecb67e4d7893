//! Immutable per-run configuration.

use crate::error::ConfigError;
use crate::field_path::FieldPath;
use crate::transform::TransformSpec;
use std::time::Duration;

/// Default number of instructions per bulk request.
pub const DEFAULT_BULK_SIZE: usize = 1000;

/// Default per-request timeout for bulk submissions.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// What to do when a batch reports failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop after the failing batch; already-submitted batches stay
    /// committed.
    #[default]
    Abort,
    /// Report the failures and keep submitting.
    WarnAndContinue,
}

/// Configuration for one import run.
///
/// Resolved once by the driver and passed by reference to every component;
/// no component reads ambient state.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Bulk endpoint host, with or without a scheme.
    pub host: String,
    /// Target index name.
    pub index: String,
    /// Target element type.
    pub doc_type: String,
    /// Instructions per bulk request.
    pub bulk_size: usize,
    /// Timeout applied to every bulk request.
    pub timeout: Duration,
    /// Field paths removed from every record before submission.
    pub ignore_paths: Vec<FieldPath>,
    /// Abort or warn on batch failures.
    pub error_policy: ErrorPolicy,
    /// Optional transform rules applied between redaction and key
    /// extraction.
    pub transform: Option<TransformSpec>,
}

impl RunOptions {
    /// Creates options for the given target with all defaults.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        index: impl Into<String>,
        doc_type: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            index: index.into(),
            doc_type: doc_type.into(),
            bulk_size: DEFAULT_BULK_SIZE,
            timeout: DEFAULT_TIMEOUT,
            ignore_paths: Vec::new(),
            error_policy: ErrorPolicy::default(),
            transform: None,
        }
    }

    /// Set the number of instructions per bulk request.
    #[must_use]
    pub fn with_bulk_size(mut self, size: usize) -> Self {
        self.bulk_size = size;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the ignore paths removed from every record.
    #[must_use]
    pub fn with_ignore_paths(mut self, paths: Vec<FieldPath>) -> Self {
        self.ignore_paths = paths;
        self
    }

    /// Set the batch-failure policy.
    #[must_use]
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Set the transform rules.
    #[must_use]
    pub fn with_transform(mut self, transform: Option<TransformSpec>) -> Self {
        self.transform = transform;
        self
    }

    /// Validates settings that cannot be enforced by construction.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBulkSize`] for a zero bulk size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bulk_size == 0 {
            return Err(ConfigError::InvalidBulkSize {
                size: self.bulk_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_BULK_SIZE, DEFAULT_TIMEOUT, ErrorPolicy, RunOptions};
    use std::time::Duration;

    #[test]
    fn defaults_match_documented_values() {
        let options = RunOptions::new("localhost:9200", "people", "person");
        assert_eq!(options.bulk_size, DEFAULT_BULK_SIZE);
        assert_eq!(options.bulk_size, 1000);
        assert_eq!(options.timeout, DEFAULT_TIMEOUT);
        assert_eq!(options.timeout, Duration::from_millis(30_000));
        assert_eq!(options.error_policy, ErrorPolicy::Abort);
        assert!(options.ignore_paths.is_empty());
        assert!(options.transform.is_none());
    }

    #[test]
    fn builders_override_defaults() {
        let options = RunOptions::new("localhost:9200", "people", "person")
            .with_bulk_size(50)
            .with_timeout(Duration::from_secs(5))
            .with_error_policy(ErrorPolicy::WarnAndContinue);
        assert_eq!(options.bulk_size, 50);
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert_eq!(options.error_policy, ErrorPolicy::WarnAndContinue);
    }

    #[test]
    fn validate_rejects_zero_bulk_size() {
        let options = RunOptions::new("localhost:9200", "people", "person").with_bulk_size(0);
        assert!(options.validate().is_err());
    }

    #[test]
    fn validate_accepts_defaults() {
        let options = RunOptions::new("localhost:9200", "people", "person");
        assert!(options.validate().is_ok());
    }
}
