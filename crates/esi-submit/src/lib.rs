//! Normalization, batching, and bulk submission for `elastic-import`.
//!
//! Records flow through [`Normalizer`] into [`IndexInstruction`] pairs,
//! [`batched`] groups them without breaking pairs, [`BulkClient`] ships each
//! batch in a single bulk call, and [`BatchReport`] classifies the per-item
//! outcome.

pub mod batch;
pub mod bulk;
pub mod client;
pub mod error;
pub mod normalize;
pub mod response;

pub use batch::{Batched, batched};
pub use bulk::{ActionMeta, IndexInstruction, encode_body};
pub use client::BulkClient;
pub use error::{Result, SubmitError};
pub use normalize::Normalizer;
pub use response::{BatchReport, BulkResponse, ItemFailure};
