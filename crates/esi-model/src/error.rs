//! Configuration and transform errors.

use thiserror::Error;

/// A problem with run configuration, raised before any input is read.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Bulk size must allow at least one instruction per batch.
    #[error("Bulk size must be at least 1 (got {size})")]
    InvalidBulkSize {
        /// The rejected value.
        size: usize,
    },

    /// An ignore path used more than one `[*]` wildcard; the intent behind
    /// nested wildcards cannot be guessed, so they are rejected outright.
    #[error("Ignore path `{path}` contains more than one [*] wildcard")]
    MultipleWildcards {
        /// The offending expression.
        path: String,
    },

    /// The delimiter option must name exactly one character or the alias
    /// `tab`.
    #[error("Invalid delimiter `{value}`: expected a single character or `tab`")]
    InvalidDelimiter {
        /// The rejected value.
        value: String,
    },

    /// The quote option must name exactly one character.
    #[error("Invalid quote `{value}`: expected a single character")]
    InvalidQuote {
        /// The rejected value.
        value: String,
    },
}

/// A transform rule failed while rewriting a record.
///
/// Transform failures are fatal: a rule that cannot be applied must stop the
/// run rather than silently submit a half-rewritten record.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransformError {
    /// A case-folding rule hit a field that does not hold a string.
    #[error("Transform rule #{rule}: field `{field}` holds {found}, expected a string")]
    NotAString {
        /// 1-based position of the rule in the transform file.
        rule: usize,
        /// The field the rule addressed.
        field: String,
        /// What the field actually held.
        found: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, TransformError};

    #[test]
    fn config_error_display() {
        let error = ConfigError::InvalidBulkSize { size: 0 };
        assert_eq!(error.to_string(), "Bulk size must be at least 1 (got 0)");

        let error = ConfigError::MultipleWildcards {
            path: "a[*].b[*].c".to_owned(),
        };
        assert!(error.to_string().contains("a[*].b[*].c"));
    }

    #[test]
    fn transform_error_display() {
        let error = TransformError::NotAString {
            rule: 2,
            field: "country".to_owned(),
            found: "a number",
        };
        assert_eq!(
            error.to_string(),
            "Transform rule #2: field `country` holds a number, expected a string"
        );
    }
}
