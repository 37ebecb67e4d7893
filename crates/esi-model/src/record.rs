//! The runtime record representation.

use serde_json::{Map, Value};

/// A single input record: an ordered mapping from field name to JSON value.
///
/// Field order is preserved from decode to submission (`serde_json` is built
/// with `preserve_order`), so removals elsewhere in the pipeline go through
/// [`Map::shift_remove`] rather than plain `remove`, which would swap the
/// last entry into the gap.
pub type Record = Map<String, Value>;

/// Converts a decoded JSON value into a [`Record`], if it is an object.
#[must_use]
pub fn as_record(value: Value) -> Option<Record> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::as_record;
    use serde_json::json;

    #[test]
    fn objects_become_records() {
        let record = as_record(json!({"a": 1, "b": 2})).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record["a"], json!(1));
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(as_record(json!([1, 2])).is_none());
        assert!(as_record(json!("text")).is_none());
        assert!(as_record(json!(null)).is_none());
    }
}
