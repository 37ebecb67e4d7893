//! Record preparation ahead of bulk submission.
//!
//! Every decoded record passes through the same fixed sequence before it is
//! batched: export wrappers are unwrapped, ignored paths removed, user
//! transforms applied, the document key extracted, and finally the
//! deployment-specific value coercions run. The order matters: transforms
//! observe raw field values, and the coercions only see what the transforms
//! left behind.

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use esi_model::{Record, RunOptions, TransformError};
use serde_json::Value;
use tracing::warn;

use crate::bulk::{ActionMeta, IndexInstruction};

/// Field whose value becomes the document key.
const ID_FIELD: &str = "_id";
/// Field that keeps a copy of the extracted key inside the document body.
const ID_COPY_FIELD: &str = "SakeId";
/// Wrapper key MongoDB exports use for object identifiers.
const OBJECT_ID_KEY: &str = "$oid";
/// Wrapper key MongoDB exports use for timestamps.
const DATE_KEY: &str = "$date";
/// Field whose empty-string value maps to the numeric zero state.
const STATUS_FIELD: &str = "Status";
/// Sentinel string the upstream exports emit for absent values.
const NULL_SENTINEL: &str = "NULL";

/// Turns decoded records into submission-ready instructions.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    options: &'a RunOptions,
}

impl<'a> Normalizer<'a> {
    pub fn new(options: &'a RunOptions) -> Self {
        Self { options }
    }

    /// Prepares one record for submission.
    ///
    /// Fails only when a transform rule hits a field of the wrong type; every
    /// other step is a plain rewrite that cannot reject a record.
    pub fn normalize(&self, mut record: Record) -> Result<IndexInstruction, TransformError> {
        unwrap_export_wrappers(&mut record);
        for path in &self.options.ignore_paths {
            path.remove_from(&mut record);
        }
        if let Some(transform) = &self.options.transform {
            transform.apply(&mut record)?;
        }
        let id = extract_key(&mut record);
        apply_deployment_coercions(&mut record);
        Ok(IndexInstruction {
            meta: ActionMeta {
                index: self.options.index.clone(),
                doc_type: self.options.doc_type.clone(),
                id,
            },
            doc: record,
        })
    }
}

/// Replaces top-level `{"$oid": ...}` and `{"$date": ...}` wrappers with
/// their scalar payloads. Only single-key objects count as wrappers; nested
/// occurrences are left alone.
fn unwrap_export_wrappers(record: &mut Record) {
    for value in record.values_mut() {
        if let Some(replacement) = wrapper_replacement(value) {
            *value = replacement;
        }
    }
}

fn wrapper_replacement(value: &Value) -> Option<Value> {
    let Value::Object(wrapper) = value else {
        return None;
    };
    if wrapper.len() != 1 {
        return None;
    }
    if let Some(Value::String(id)) = wrapper.get(OBJECT_ID_KEY) {
        return Some(Value::String(id.clone()));
    }
    match wrapper.get(DATE_KEY)? {
        Value::String(text) => match parse_timestamp(text) {
            Some(moment) => Some(Value::String(format_timestamp(moment))),
            None => {
                warn!(value = %text, "unrecognized $date value left untouched");
                None
            }
        },
        Value::Number(millis) => match millis.as_i64().and_then(timestamp_from_millis) {
            Some(moment) => Some(Value::String(format_timestamp(moment))),
            None => {
                warn!(value = %millis, "out-of-range $date value left untouched");
                None
            }
        },
        _ => None,
    }
}

/// Accepts RFC 3339 timestamps, bare `YYYY-MM-DD` dates (taken as UTC
/// midnight), and stringified epoch milliseconds.
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(moment) = DateTime::parse_from_rfc3339(text) {
        return Some(moment.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    text.parse::<i64>().ok().and_then(timestamp_from_millis)
}

fn timestamp_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

fn format_timestamp(moment: DateTime<Utc>) -> String {
    moment.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Pulls a usable `_id` out of the record. Non-empty strings and numbers
/// become the document key; the original value moves to [`ID_COPY_FIELD`] at
/// the end of the record. Anything else stays in the body and the document
/// submits keyless.
fn extract_key(record: &mut Record) -> Option<String> {
    let key = match record.get(ID_FIELD)? {
        Value::String(id) if !id.is_empty() => id.clone(),
        Value::Number(id) => id.to_string(),
        _ => return None,
    };
    let original = record.shift_remove(ID_FIELD)?;
    record.insert(ID_COPY_FIELD.to_owned(), original);
    Some(key)
}

/// Backend-specific value fixups: an empty `Status` string becomes the
/// numeric zero state, and the `NULL` sentinel empties out in every string
/// field. Both run last so transforms still see the raw values.
fn apply_deployment_coercions(record: &mut Record) {
    if matches!(record.get(STATUS_FIELD), Some(Value::String(text)) if text.is_empty()) {
        record.insert(STATUS_FIELD.to_owned(), Value::Number(0.into()));
    }
    for value in record.values_mut() {
        if let Value::String(text) = value {
            if text == NULL_SENTINEL {
                text.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use esi_model::{FieldPath, TransformRule, TransformSpec, as_record};
    use serde_json::json;

    use super::*;

    fn options() -> RunOptions {
        RunOptions::new("localhost:9200", "people", "person")
    }

    fn normalize(options: &RunOptions, record: Value) -> IndexInstruction {
        Normalizer::new(options)
            .normalize(as_record(record).expect("test record must be an object"))
            .expect("normalization should succeed")
    }

    #[test]
    fn unwraps_object_id_wrappers_into_keys() {
        let out = normalize(
            &options(),
            json!({"_id": {"$oid": "507f191e810c19729de860ea"}, "name": "a"}),
        );
        assert_eq!(out.meta.id.as_deref(), Some("507f191e810c19729de860ea"));
        assert_eq!(
            out.doc.get(ID_COPY_FIELD),
            Some(&json!("507f191e810c19729de860ea"))
        );
        assert!(!out.doc.contains_key(ID_FIELD));
    }

    #[test]
    fn parses_date_wrappers() {
        let out = normalize(
            &options(),
            json!({
                "iso": {"$date": "2020-01-01T00:00:00Z"},
                "day": {"$date": "2020-01-01"},
                "millis": {"$date": 1_577_836_800_000_i64},
            }),
        );
        assert_eq!(out.doc.get("iso"), Some(&json!("2020-01-01T00:00:00Z")));
        assert_eq!(out.doc.get("day"), Some(&json!("2020-01-01T00:00:00Z")));
        assert_eq!(out.doc.get("millis"), Some(&json!("2020-01-01T00:00:00Z")));
    }

    #[test]
    fn leaves_unparseable_dates_untouched() {
        let out = normalize(&options(), json!({"d": {"$date": "soon"}}));
        assert_eq!(out.doc.get("d"), Some(&json!({"$date": "soon"})));
    }

    #[test]
    fn multi_key_objects_are_not_wrappers() {
        let out = normalize(&options(), json!({"d": {"$oid": "x", "extra": 1}}));
        assert_eq!(out.doc.get("d"), Some(&json!({"$oid": "x", "extra": 1})));
    }

    #[test]
    fn string_key_moves_to_the_end_of_the_record() {
        let out = normalize(&options(), json!({"_id": "X", "v": 1}));
        assert_eq!(out.meta.id.as_deref(), Some("X"));
        let body = serde_json::to_string(&out.doc).unwrap();
        assert_eq!(body, r#"{"v":1,"SakeId":"X"}"#);
    }

    #[test]
    fn numeric_keys_keep_their_type_in_the_copy() {
        let out = normalize(&options(), json!({"_id": 42, "v": 1}));
        assert_eq!(out.meta.id.as_deref(), Some("42"));
        assert_eq!(out.doc.get(ID_COPY_FIELD), Some(&json!(42)));
    }

    #[test]
    fn unusable_keys_stay_in_the_body() {
        for id in [json!(""), json!(true), json!(["a"]), json!(null)] {
            let out = normalize(&options(), json!({"_id": id.clone(), "v": 1}));
            assert_eq!(out.meta.id, None, "id {id} should not become a key");
            assert_eq!(out.doc.get(ID_FIELD), Some(&id));
            assert!(!out.doc.contains_key(ID_COPY_FIELD));
        }
    }

    #[test]
    fn empty_status_becomes_zero() {
        let out = normalize(&options(), json!({"Status": "", "note": ""}));
        assert_eq!(out.doc.get(STATUS_FIELD), Some(&json!(0)));
        assert_eq!(out.doc.get("note"), Some(&json!("")));
    }

    #[test]
    fn null_sentinels_empty_out_everywhere() {
        let out = normalize(&options(), json!({"v": "NULL", "w": "null", "n": 1}));
        assert_eq!(out.doc.get("v"), Some(&json!("")));
        assert_eq!(out.doc.get("w"), Some(&json!("null")));
        assert_eq!(out.doc.get("n"), Some(&json!(1)));
    }

    #[test]
    fn transforms_observe_raw_values() {
        let opts = options().with_transform(Some(TransformSpec::new(vec![TransformRule::Replace {
            field: "v".to_owned(),
            matches: json!("NULL"),
            with: json!("kept"),
        }])));
        let out = normalize(&opts, json!({"v": "NULL"}));
        assert_eq!(out.doc.get("v"), Some(&json!("kept")));
    }

    #[test]
    fn ignored_paths_are_removed() {
        let opts = options().with_ignore_paths(vec![FieldPath::parse("secret").unwrap()]);
        let out = normalize(&opts, json!({"secret": "s3cr3t", "v": 2}));
        let body = serde_json::to_string(&out.doc).unwrap();
        assert_eq!(body, r#"{"v":2}"#);
    }

    #[test]
    fn meta_carries_the_target_index_and_type() {
        let out = normalize(&options(), json!({"v": 1}));
        assert_eq!(out.meta.index, "people");
        assert_eq!(out.meta.doc_type, "person");
    }
}
