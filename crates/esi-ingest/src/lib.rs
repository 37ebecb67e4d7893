//! Input decoders for `elastic-import`: streaming newline-delimited JSON,
//! whole-document JSON, and delimited text.
//!
//! Every decoder produces [`esi_model::Record`] values. Decode failures are
//! fatal for the run; none of the decoders skip bad input.

pub mod delimited;
pub mod error;
pub mod json;
pub mod ndjson;

pub use delimited::{ColumnSource, DelimitedOptions};
pub use error::{IngestError, Result};
pub use ndjson::NdjsonReader;
