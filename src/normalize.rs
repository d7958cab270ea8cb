//! Normalisation of loosely-shaped verse data into an ordered list of strings.
//!
//! Verse, translation and transliteration files arrive in several shapes:
//!
//! - `["v1", "v2", ...]`
//! - `{"1": "v1", "2": "v2", ...}`
//! - a container such as `{"ayahs": ...}` or `[{"ayahs": ...}]` wrapping either
//!   of the above
//!
//! Entries may themselves be strings, arrays of strings, or objects carrying
//! the text under a common field name. Anything else normalises to an empty
//! list so the caller can show "no data" for that slice of content.

use serde_json::{Map, Value};

const CONTAINER_KEYS: [&str; 5] = ["ayahs", "ayat", "verses", "data", "items"];

const TEXT_KEYS: [&str; 9] = [
    "text",
    "content",
    "value",
    "translation",
    "transliteration",
    "en",
    "line",
    "t",
    "v",
];

/// Normalise `raw` into verse order.
pub fn normalize_to_ordered_strings(raw: &Value) -> Vec<String> {
    match unwrap_container(raw) {
        Value::Array(items) => items.iter().map(text_of).collect(),
        Value::Object(map) => numeric_keyed(map),
        _ => Vec::new(),
    }
}

fn unwrap_container(raw: &Value) -> &Value {
    match raw {
        Value::Object(map) => CONTAINER_KEYS
            .iter()
            .find_map(|k| map.get(*k))
            .map(unwrap_container)
            .unwrap_or(raw),
        Value::Array(items) if items.len() == 1 && is_container(&items[0]) => {
            unwrap_container(&items[0])
        }
        _ => raw,
    }
}

fn is_container(v: &Value) -> bool {
    v.as_object()
        .is_some_and(|map| CONTAINER_KEYS.iter().any(|k| map.contains_key(*k)))
}

fn numeric_keyed(map: &Map<String, Value>) -> Vec<String> {
    let mut keyed: Vec<(u64, &Value)> = map
        .iter()
        .filter_map(|(k, v)| k.trim().parse::<u64>().ok().map(|n| (n, v)))
        .collect();
    keyed.sort_by_key(|(n, _)| *n);
    keyed.into_iter().map(|(_, v)| text_of(v)).collect()
}

/// Extract the text of a single entry.
fn text_of(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .map(text_of)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        Value::Object(map) => TEXT_KEYS
            .iter()
            .filter_map(|k| map.get(*k))
            .map(text_of)
            .find(|s| !s.is_empty())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_array() {
        let v = json!(["a b", "c"]);
        assert_eq!(normalize_to_ordered_strings(&v), vec!["a b", "c"]);
    }

    #[test]
    fn numeric_keys_sort_numerically() {
        let v = json!({"10": "ten", "2": "two", "1": "one", "note": "skip"});
        assert_eq!(normalize_to_ordered_strings(&v), vec!["one", "two", "ten"]);
    }

    #[test]
    fn container_object_and_wrapped_array() {
        let inner = json!({"2": "second", "1": "first"});
        let wrapped = json!({ "ayahs": inner });
        let listed = json!([{ "ayahs": {"2": "second", "1": "first"} }]);
        assert_eq!(normalize_to_ordered_strings(&wrapped), vec!["first", "second"]);
        assert_eq!(normalize_to_ordered_strings(&listed), vec!["first", "second"]);
        assert_eq!(
            normalize_to_ordered_strings(&json!({"verses": ["x", "y"]})),
            vec!["x", "y"]
        );
    }

    #[test]
    fn object_entries_use_text_fields() {
        let v = json!([{"text": "hello"}, {"translation": "world"}, {"other": 1}]);
        assert_eq!(normalize_to_ordered_strings(&v), vec!["hello", "world", ""]);
    }

    #[test]
    fn non_string_entries_become_empty() {
        let v = json!(["ok", 3, null, ["a", "b"]]);
        assert_eq!(normalize_to_ordered_strings(&v), vec!["ok", "", "", "a b"]);
    }

    #[test]
    fn malformed_shapes_are_empty() {
        assert!(normalize_to_ordered_strings(&json!(null)).is_empty());
        assert!(normalize_to_ordered_strings(&json!(42)).is_empty());
        assert!(normalize_to_ordered_strings(&json!("just text")).is_empty());
        assert!(normalize_to_ordered_strings(&json!({"name": "x"})).is_empty());
    }
}
