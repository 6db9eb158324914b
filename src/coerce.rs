//! Lenient conversion from arbitrary JSON into typed records.
//!
//! Stored blobs and imported files are untrusted: fields may be missing,
//! `null`, or carry the wrong JSON type (a form field saved `"48"` where a
//! number was expected, a single string where a list was expected). Every
//! helper here is total: it returns `None` (or an empty container) instead
//! of failing, and callers fall back to the record's default value.
//!
//! Non-object inputs behave like an empty object because
//! [`Value::get`] returns `None` for anything that is not a map.

use serde_json::{Map, Value};

/// Build `Self` from a loosely-shaped JSON value without ever failing.
pub trait Coerce: Sized {
    fn coerce(value: &Value) -> Self;
}

/// Return `value[key]` unless it is absent or `null`.
pub fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

/// Render a scalar as text. Objects, arrays and `null` yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a finite number from a JSON number or a numeric string.
pub fn scalar_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

pub fn text(value: &Value, key: &str) -> Option<String> {
    field(value, key).and_then(scalar_text)
}

pub fn text_or(value: &Value, key: &str, default: &str) -> String {
    text(value, key).unwrap_or_else(|| default.to_string())
}

/// Like [`text`] but treats an empty string as absent.
pub fn non_empty_text(value: &Value, key: &str) -> Option<String> {
    text(value, key).filter(|s| !s.is_empty())
}

/// First non-empty text found under any of `keys`, in order.
pub fn first_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| non_empty_text(value, key))
}

pub fn number(value: &Value, key: &str) -> Option<f64> {
    field(value, key).and_then(scalar_number)
}

pub fn first_number(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| number(value, key))
}

/// Read a boolean; accepts `true`/`false`, numbers (non-zero is true) and
/// the strings `"true"`/`"false"`.
pub fn flag(value: &Value, key: &str) -> Option<bool> {
    match field(value, key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Read a list of strings.
///
/// Arrays keep their scalar items in order (non-scalars are skipped); a
/// single string is split on commas so `"recon, relay"` becomes two tags.
pub fn strings(value: &Value, key: &str) -> Option<Vec<String>> {
    match field(value, key)? {
        Value::Array(items) => Some(items.iter().filter_map(scalar_text).collect()),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

/// Coerce every object in the array under `key`; anything else yields an
/// empty list.
pub fn list<T: Coerce>(value: &Value, key: &str) -> Vec<T> {
    match field(value, key) {
        Some(Value::Array(items)) => objects(items),
        _ => Vec::new(),
    }
}

/// Coerce every object item of `items`, skipping scalars and `null`s.
pub fn objects<T: Coerce>(items: &[Value]) -> Vec<T> {
    items
        .iter()
        .filter(|item| item.is_object())
        .map(T::coerce)
        .collect()
}

/// The object's entries minus `known` keys, kept verbatim so foreign tool
/// data survives a load/save cycle.
pub fn extra_fields(value: &Value, known: &[&str]) -> Map<String, Value> {
    value
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter(|(k, _)| !known.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_stringifies_scalars_and_rejects_containers() {
        let v = json!({ "a": "x", "b": 4, "c": true, "d": [1], "e": null });
        assert_eq!(text(&v, "a").as_deref(), Some("x"));
        assert_eq!(text(&v, "b").as_deref(), Some("4"));
        assert_eq!(text(&v, "c").as_deref(), Some("true"));
        assert_eq!(text(&v, "d"), None);
        assert_eq!(text(&v, "e"), None);
        assert_eq!(text(&v, "missing"), None);
    }

    #[test]
    fn number_parses_numeric_strings_and_drops_garbage() {
        let v = json!({ "a": 48, "b": " 12.5 ", "c": "soon", "d": "NaN", "e": "inf" });
        assert_eq!(number(&v, "a"), Some(48.0));
        assert_eq!(number(&v, "b"), Some(12.5));
        assert_eq!(number(&v, "c"), None);
        assert_eq!(number(&v, "d"), None);
        assert_eq!(number(&v, "e"), None);
    }

    #[test]
    fn flag_accepts_bools_numbers_and_words() {
        let v = json!({ "a": true, "b": 0, "c": "TRUE", "d": "maybe" });
        assert_eq!(flag(&v, "a"), Some(true));
        assert_eq!(flag(&v, "b"), Some(false));
        assert_eq!(flag(&v, "c"), Some(true));
        assert_eq!(flag(&v, "d"), None);
    }

    #[test]
    fn strings_split_comma_separated_text() {
        let v = json!({ "tags": "recon, relay,,", "list": ["a", 2, {"x": 1}] });
        assert_eq!(strings(&v, "tags").unwrap(), vec!["recon", "relay"]);
        assert_eq!(strings(&v, "list").unwrap(), vec!["a", "2"]);
    }

    #[test]
    fn helpers_treat_non_objects_as_empty() {
        let v = json!("not an object");
        assert_eq!(text(&v, "name"), None);
        assert!(extra_fields(&v, &[]).is_empty());
        assert_eq!(first_number(&Value::Null, &["a", "b"]), None);
    }

    #[test]
    fn extra_fields_skips_known_keys() {
        let v = json!({ "id": "n1", "name": "Relay", "mast": 6 });
        let extra = extra_fields(&v, &["id", "name"]);
        assert_eq!(extra.len(), 1);
        assert_eq!(extra["mast"], 6);
    }
}
