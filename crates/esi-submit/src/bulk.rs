//! Indexing instructions and the bulk wire format.
//!
//! The bulk endpoint consumes newline-delimited JSON: one action line
//! followed by one document line per instruction, with a trailing newline.

use crate::error::Result;
use esi_model::Record;
use serde::Serialize;

/// Per-document submission directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMeta {
    /// Target index.
    pub index: String,
    /// Target element type.
    pub doc_type: String,
    /// Explicit document key; the backend assigns one when absent.
    pub id: Option<String>,
}

/// An action/document pair. Pairs are always submitted together, in the
/// order they were produced; batch boundaries never split a pair.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexInstruction {
    /// Submission directive.
    pub meta: ActionMeta,
    /// Normalized document body.
    pub doc: Record,
}

#[derive(Serialize)]
struct ActionLine<'a> {
    index: ActionBody<'a>,
}

#[derive(Serialize)]
struct ActionBody<'a> {
    #[serde(rename = "_index")]
    index: &'a str,
    #[serde(rename = "_type")]
    doc_type: &'a str,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
}

/// Encodes a batch as the newline-delimited bulk request body.
///
/// # Errors
///
/// Fails only when a document cannot be serialized.
pub fn encode_body(batch: &[IndexInstruction]) -> Result<String> {
    let mut body = String::with_capacity(batch.len() * 64);
    for instruction in batch {
        let action = ActionLine {
            index: ActionBody {
                index: &instruction.meta.index,
                doc_type: &instruction.meta.doc_type,
                id: instruction.meta.id.as_deref(),
            },
        };
        body.push_str(&serde_json::to_string(&action)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(&instruction.doc)?);
        body.push('\n');
    }
    Ok(body)
}
