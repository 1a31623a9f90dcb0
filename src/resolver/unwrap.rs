//! Response unwrapper
//!
//! The listing endpoint answers with a bare array, `{ "notes": [...] }` or
//! `{ "result": [...] }`. Anything else is treated as an empty listing.

use serde_json::Value;

/// Member fields checked, in priority order
const LISTING_FIELDS: [&str; 2] = ["notes", "result"];

/// Extract the flat entry listing from a decoded response. Never fails.
pub fn extract_entries(data: &Value) -> &[Value] {
    if let Value::Array(items) = data {
        return items;
    }

    LISTING_FIELDS
        .iter()
        .find_map(|field| data.get(field).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let data = json!(["a.txt", "b.txt"]);
        assert_eq!(extract_entries(&data).len(), 2);
    }

    #[test]
    fn test_notes_member() {
        let data = json!({"notes": ["a.txt"]});
        assert_eq!(extract_entries(&data), &[json!("a.txt")]);
    }

    #[test]
    fn test_result_member() {
        let data = json!({"result": [{"name": "a"}]});
        assert_eq!(extract_entries(&data), &[json!({"name": "a"})]);
    }

    #[test]
    fn test_notes_wins_over_result() {
        let data = json!({"result": ["r"], "notes": ["n"]});
        assert_eq!(extract_entries(&data), &[json!("n")]);
    }

    #[test]
    fn test_non_array_notes_falls_through_to_result() {
        let data = json!({"notes": "oops", "result": ["r"]});
        assert_eq!(extract_entries(&data), &[json!("r")]);
    }

    #[test]
    fn test_other_shapes_are_empty() {
        for data in [
            json!(null),
            json!("text"),
            json!(42),
            json!({}),
            json!({"items": ["a"]}),
            json!({"notes": {"a": 1}}),
        ] {
            assert!(extract_entries(&data).is_empty(), "{}", data);
        }
    }
}
