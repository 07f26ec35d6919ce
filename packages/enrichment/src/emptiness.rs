//! Field emptiness classification.
//!
//! Pipedrive represents "unset" differently per field shape: built-ins are
//! null or "", phone/email fields are lists of `{value, primary, label}`
//! objects that may exist with blank values, enums are null. One rule set
//! covers all shapes so every caller agrees on what "empty" means.

use serde_json::Value;

/// Decide whether a CRM field value counts as unset.
///
/// Rules, in order: null → empty; blank or whitespace-only string → empty;
/// empty list → empty; list where every element is a structured value
/// whose `"value"` sub-field is blank → empty; anything else → not empty.
///
/// Numeric `0` is a legitimately filled value, never empty.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => {
            items.is_empty() || items.iter().all(element_value_is_blank)
        }
        _ => false,
    }
}

/// A list element is blank when it is an object whose "value" sub-field
/// is missing, null, or a blank string.
fn element_value_is_blank(element: &Value) -> bool {
    match element {
        Value::Object(map) => match map.get("value") {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_and_blank_strings_are_empty() {
        assert!(is_empty(&Value::Null));
        assert!(is_empty(&json!("")));
        assert!(is_empty(&json!("   ")));
        assert!(!is_empty(&json!("x")));
    }

    #[test]
    fn lists_of_blank_structured_values_are_empty() {
        assert!(is_empty(&json!([])));
        assert!(is_empty(&json!([{ "value": "" }])));
        assert!(is_empty(&json!([{ "value": "" }, { "value": null }])));
        assert!(is_empty(&json!([{ "primary": true }])));
        assert!(!is_empty(&json!([{ "value": "x" }])));
        assert!(!is_empty(&json!([{ "value": "" }, { "value": "+1 555" }])));
    }

    #[test]
    fn zero_is_filled() {
        assert!(!is_empty(&json!(0)));
        assert!(!is_empty(&json!(0.0)));
        assert!(!is_empty(&json!(false)));
    }

    #[test]
    fn bare_strings_in_lists_are_not_blank() {
        // A list of plain strings is a filled value, whatever it holds.
        assert!(!is_empty(&json!(["a"])));
    }
}
