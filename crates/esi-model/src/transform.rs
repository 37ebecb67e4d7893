//! Declarative record transforms loaded from `--transform-file`.
//!
//! The file is a JSON array of rule objects tagged by `op`, applied in order
//! to every record after redaction and before key extraction:
//!
//! ```json
//! [
//!   {"op": "rename", "field": "email", "to": "contact"},
//!   {"op": "replace", "field": "state", "matches": "N/A", "with": null},
//!   {"op": "lowercase", "field": "country"}
//! ]
//! ```
//!
//! An empty rule list leaves every record unchanged. Rule failures abort the
//! run; they are never swallowed.

use crate::error::TransformError;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single transform rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum TransformRule {
    /// Set `field` to a constant, inserting it when absent.
    Set {
        /// Target field name.
        field: String,
        /// Value to assign.
        value: Value,
    },
    /// Move the value of `field` to `to`; no-op when `field` is absent.
    Rename {
        /// Source field name.
        field: String,
        /// Destination field name.
        to: String,
    },
    /// Remove `field` when present.
    Drop {
        /// Field to remove.
        field: String,
    },
    /// Replace the value of `field` with `with` when it equals `matches`.
    Replace {
        /// Target field name.
        field: String,
        /// Value that triggers the replacement.
        matches: Value,
        /// Replacement value.
        with: Value,
    },
    /// Lower-case the string at `field`; fails on non-strings.
    Lowercase {
        /// Target field name.
        field: String,
    },
    /// Upper-case the string at `field`; fails on non-strings.
    Uppercase {
        /// Target field name.
        field: String,
    },
}

/// An ordered list of transform rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformSpec {
    rules: Vec<TransformRule>,
}

impl TransformSpec {
    /// Builds a spec from rules already in hand.
    #[must_use]
    pub fn new(rules: Vec<TransformRule>) -> Self {
        Self { rules }
    }

    /// Parses the JSON rule-file format.
    ///
    /// # Errors
    ///
    /// Returns the parse error for anything that is not a JSON array of
    /// recognized rule objects.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// True when no rules are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies every rule in order, mutating `record` in place.
    ///
    /// # Errors
    ///
    /// Returns the first rule failure. The record may have been partially
    /// rewritten at that point and must not be submitted.
    pub fn apply(&self, record: &mut Record) -> Result<(), TransformError> {
        for (position, rule) in self.rules.iter().enumerate() {
            rule.apply(position + 1, record)?;
        }
        Ok(())
    }
}

impl TransformRule {
    fn apply(&self, position: usize, record: &mut Record) -> Result<(), TransformError> {
        match self {
            Self::Set { field, value } => {
                record.insert(field.clone(), value.clone());
            }
            Self::Rename { field, to } => {
                if let Some(value) = record.shift_remove(field) {
                    record.insert(to.clone(), value);
                }
            }
            Self::Drop { field } => {
                record.shift_remove(field);
            }
            Self::Replace {
                field,
                matches,
                with,
            } => {
                if let Some(value) = record.get_mut(field) {
                    if value == matches {
                        *value = with.clone();
                    }
                }
            }
            Self::Lowercase { field } => case_fold(position, field, record, str::to_lowercase)?,
            Self::Uppercase { field } => case_fold(position, field, record, str::to_uppercase)?,
        }
        Ok(())
    }
}

fn case_fold(
    position: usize,
    field: &str,
    record: &mut Record,
    fold: impl Fn(&str) -> String,
) -> Result<(), TransformError> {
    let Some(value) = record.get_mut(field) else {
        return Ok(());
    };
    match value {
        Value::String(text) => {
            *text = fold(text);
            Ok(())
        }
        other => Err(TransformError::NotAString {
            rule: position,
            field: field.to_owned(),
            found: value_kind(other),
        }),
    }
}

/// Human-readable name for a JSON value's type.
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
