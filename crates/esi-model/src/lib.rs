//! Core data model for the `elastic-import` pipeline: the record
//! representation, field-path expressions, per-run options, and declarative
//! transform rules.

pub mod error;
pub mod field_path;
pub mod options;
pub mod record;
pub mod transform;

pub use error::{ConfigError, TransformError};
pub use field_path::FieldPath;
pub use options::{DEFAULT_BULK_SIZE, DEFAULT_TIMEOUT, ErrorPolicy, RunOptions};
pub use record::{Record, as_record};
pub use transform::{TransformRule, TransformSpec};
