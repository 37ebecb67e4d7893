//! Field-path expressions for record redaction.
//!
//! A path is a dotted sequence of segments (`a.b.c`); a segment may carry
//! numeric index suffixes (`addresses[0].city`); at most one `[*].` marker
//! splits the path into a base that must resolve to an array and a remainder
//! removed from every element (`members[*].email`).

use crate::error::ConfigError;
use crate::record::Record;
use serde_json::Value;

const WILDCARD_MARKER: &str = "[*].";

/// A parsed field-path expression identifying data to remove before
/// submission.
///
/// Malformed expressions (unclosed brackets, non-numeric indexes, empty
/// segments, a wildcard with no base or no remainder) parse to inert paths
/// whose removal is a no-op: a bad ignore entry must never abort an import
/// run. Only multiple `[*]` wildcards are rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    kind: PathKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathKind {
    /// Plain dotted path, removed at its terminal step.
    Direct(Vec<Step>),
    /// `base[*].remainder`: remove `remainder` from every element of the
    /// array at `base`.
    Spread {
        base: Vec<Step>,
        remainder: Vec<Step>,
    },
    /// Unparseable expression; removal is a no-op.
    Inert,
}

/// One resolution step inside a path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    /// Descend into the named field of a mapping.
    Key(String),
    /// Descend into the n-th element of an array.
    Index(usize),
}

impl FieldPath {
    /// Parses a path expression, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MultipleWildcards`] when the expression
    /// contains more than one `[*]` marker.
    pub fn parse(expr: &str) -> Result<Self, ConfigError> {
        let raw = expr.trim().to_owned();
        if raw.matches("[*]").count() > 1 {
            return Err(ConfigError::MultipleWildcards { path: raw });
        }
        let kind = match raw.split_once(WILDCARD_MARKER) {
            Some((base, remainder)) => match (parse_steps(base), parse_steps(remainder)) {
                (Some(base), Some(remainder)) => PathKind::Spread { base, remainder },
                _ => PathKind::Inert,
            },
            // A `[*]` without a following segment has nothing to remove.
            None if raw.contains("[*]") => PathKind::Inert,
            None => parse_steps(&raw).map_or(PathKind::Inert, PathKind::Direct),
        };
        Ok(Self { raw, kind })
    }

    /// The original expression text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Removes the addressed field(s) from `record` in place.
    ///
    /// Missing intermediate fields, non-mapping values along the way, and
    /// out-of-range indexes are silent no-ops; removal never fails and is
    /// idempotent.
    pub fn remove_from(&self, record: &mut Record) {
        match &self.kind {
            PathKind::Direct(steps) => remove_from_map(record, steps),
            PathKind::Spread { base, remainder } => {
                let Some(elements) = resolve_array_mut(record, base) else {
                    return;
                };
                for element in elements {
                    if let Value::Object(map) = element {
                        remove_from_map(map, remainder);
                    }
                }
            }
            PathKind::Inert => {}
        }
    }
}

/// Parses a dotted path into steps. Returns `None` when any segment is
/// malformed (empty name, unclosed bracket, non-numeric index).
fn parse_steps(path: &str) -> Option<Vec<Step>> {
    if path.is_empty() {
        return None;
    }
    let mut steps = Vec::new();
    for segment in path.split('.') {
        let (name, suffixes) = match segment.find('[') {
            Some(position) => segment.split_at(position),
            None => (segment, ""),
        };
        if name.is_empty() {
            return None;
        }
        steps.push(Step::Key(name.to_owned()));
        let mut rest = suffixes;
        while !rest.is_empty() {
            let inner = rest.strip_prefix('[')?;
            let (index, tail) = inner.split_once(']')?;
            if index.is_empty() || !index.bytes().all(|byte| byte.is_ascii_digit()) {
                return None;
            }
            steps.push(Step::Index(index.parse().ok()?));
            rest = tail;
        }
    }
    Some(steps)
}

/// Removes the value addressed by `steps` from a mapping. The first step of
/// any parsed path is always a key, since records are mappings at the root.
fn remove_from_map(map: &mut Record, steps: &[Step]) {
    let Some((first, rest)) = steps.split_first() else {
        return;
    };
    let Step::Key(name) = first else {
        return;
    };
    if rest.is_empty() {
        map.shift_remove(name);
        return;
    }
    if let Some(inner) = map.get_mut(name) {
        remove_from_value(inner, rest);
    }
}

fn remove_from_value(value: &mut Value, steps: &[Step]) {
    let Some((first, rest)) = steps.split_first() else {
        return;
    };
    if rest.is_empty() {
        match (first, value) {
            (Step::Key(name), Value::Object(map)) => {
                map.shift_remove(name);
            }
            // Nulling the slot keeps sibling indices stable; later paths
            // into the same array still land where they expect.
            (Step::Index(index), Value::Array(elements)) => {
                if let Some(slot) = elements.get_mut(*index) {
                    *slot = Value::Null;
                }
            }
            _ => {}
        }
        return;
    }
    let inner = match (first, value) {
        (Step::Key(name), Value::Object(map)) => map.get_mut(name),
        (Step::Index(index), Value::Array(elements)) => elements.get_mut(*index),
        _ => None,
    };
    if let Some(inner) = inner {
        remove_from_value(inner, rest);
    }
}

/// Descends `steps` from the record root and returns the array found there,
/// if any.
fn resolve_array_mut<'a>(record: &'a mut Record, steps: &[Step]) -> Option<&'a mut Vec<Value>> {
    let (first, rest) = steps.split_first()?;
    let Step::Key(name) = first else {
        return None;
    };
    let mut current = record.get_mut(name)?;
    for step in rest {
        current = match (step, current) {
            (Step::Key(name), Value::Object(map)) => map.get_mut(name)?,
            (Step::Index(index), Value::Array(elements)) => elements.get_mut(*index)?,
            _ => return None,
        };
    }
    match current {
        Value::Array(elements) => Some(elements),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::FieldPath;
    use crate::record::Record;
    use serde_json::{Value, json};

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    fn removed(expr: &str, value: Value) -> Value {
        let mut map = record(value);
        FieldPath::parse(expr).unwrap().remove_from(&mut map);
        Value::Object(map)
    }

    #[test]
    fn removes_top_level_field() {
        assert_eq!(removed("b", json!({"a": 1, "b": 2})), json!({"a": 1}));
    }

    #[test]
    fn removes_nested_field() {
        let result = removed("a.b.c", json!({"a": {"b": {"c": 1, "d": 2}}}));
        assert_eq!(result, json!({"a": {"b": {"d": 2}}}));
    }

    #[test]
    fn missing_intermediate_is_a_noop() {
        let original = json!({"a": {"x": 1}});
        assert_eq!(removed("a.b.c", original.clone()), original);
    }

    #[test]
    fn non_mapping_intermediate_is_a_noop() {
        let original = json!({"a": "scalar"});
        assert_eq!(removed("a.b", original.clone()), original);
    }

    #[test]
    fn indexed_descent_reaches_array_elements() {
        let result = removed("rows[1].x", json!({"rows": [{"x": 1}, {"x": 2, "y": 3}]}));
        assert_eq!(result, json!({"rows": [{"x": 1}, {"y": 3}]}));
    }

    #[test]
    fn terminal_index_nulls_the_slot() {
        let result = removed("rows[1]", json!({"rows": [1, 2, 3]}));
        assert_eq!(result, json!({"rows": [1, null, 3]}));
    }

    #[test]
    fn out_of_range_index_is_a_noop() {
        let original = json!({"rows": [1]});
        assert_eq!(removed("rows[5]", original.clone()), original);
    }

    #[test]
    fn wildcard_removes_from_every_element() {
        let result = removed(
            "items[*].b",
            json!({"items": [{"a": 1, "b": 2}, {"a": 3, "b": 4}]}),
        );
        assert_eq!(result, json!({"items": [{"a": 1}, {"a": 3}]}));
    }

    #[test]
    fn wildcard_tolerates_elements_missing_the_field() {
        let result = removed("items[*].b", json!({"items": [{"b": 1}, {"a": 2}, 7]}));
        assert_eq!(result, json!({"items": [{}, {"a": 2}, 7]}));
    }

    #[test]
    fn wildcard_on_non_array_is_a_noop() {
        let original = json!({"items": {"b": 1}});
        assert_eq!(removed("items[*].b", original.clone()), original);
    }

    #[test]
    fn wildcard_base_may_be_nested() {
        let result = removed(
            "a.b[*].secret",
            json!({"a": {"b": [{"secret": 1, "keep": 2}]}}),
        );
        assert_eq!(result, json!({"a": {"b": [{"keep": 2}]}}));
    }

    #[test]
    fn removal_is_idempotent() {
        let path = FieldPath::parse("items[*].b").unwrap();
        let mut once = record(json!({"items": [{"a": 1, "b": 2}]}));
        path.remove_from(&mut once);
        let mut twice = once.clone();
        path.remove_from(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn malformed_expressions_are_inert() {
        let original = json!({"a": {"b": 1}, "items": [{"b": 2}]});
        for expr in ["", "a[x].b", "a[1", "a[]", "items[*]", ".a", "a.", "a[-1]"] {
            assert_eq!(removed(expr, original.clone()), original, "expr {expr:?}");
        }
    }

    #[test]
    fn multiple_wildcards_are_rejected() {
        assert!(FieldPath::parse("a[*].b[*].c").is_err());
    }

    #[test]
    fn parse_trims_whitespace() {
        let path = FieldPath::parse("  a.b  ").unwrap();
        assert_eq!(path.as_str(), "a.b");
    }
}
