//! Extracted value → provider representation.
//!
//! The formatter is the only gate between model output and the CRM write:
//! values that cannot be mapped (unknown enum label, unparsable number)
//! come back as `None` and are reported as not found.

use serde_json::{json, Value};

use crate::registry::{FieldDescriptor, FieldKind, IndustryOption};

/// Convert a raw extracted value into the provider's representation.
///
/// Returns `None` when the value cannot be represented; the caller treats
/// that as "not found" rather than an error.
pub fn format_value(
    descriptor: &FieldDescriptor,
    raw: &Value,
    industry_options: &[IndustryOption],
) -> Option<Value> {
    if raw.is_null() {
        return None;
    }

    match descriptor.kind {
        FieldKind::Enum => {
            let label = raw.as_str()?.trim();
            industry_options
                .iter()
                .find(|o| o.label.eq_ignore_ascii_case(label))
                .map(|o| json!(o.id))
        }
        FieldKind::Phone | FieldKind::Email => {
            let value = raw.as_str()?.trim();
            if value.is_empty() {
                return None;
            }
            Some(json!([{ "value": value, "primary": true, "label": "work" }]))
        }
        FieldKind::Number => format_number(raw),
        FieldKind::Text | FieldKind::Address => {
            let text = coerce_str(raw)?;
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(json!(trimmed))
            }
        }
    }
}

/// Numbers may arrive as JSON numbers or as formatted strings ("1,234").
/// Strip everything except digits and a single decimal point, then parse
/// as integer if no point remains, float otherwise.
fn format_number(raw: &Value) -> Option<Value> {
    if raw.is_number() {
        return Some(raw.clone());
    }

    let text = raw.as_str()?;
    let mut cleaned = String::with_capacity(text.len());
    let mut seen_point = false;
    for ch in text.chars() {
        if ch.is_ascii_digit() {
            cleaned.push(ch);
        } else if ch == '.' && !seen_point {
            seen_point = true;
            cleaned.push(ch);
        }
    }

    if cleaned.is_empty() || cleaned == "." {
        return None;
    }

    if seen_point {
        let parsed: f64 = cleaned.parse().ok()?;
        serde_json::Number::from_f64(parsed).map(Value::Number)
    } else {
        let parsed: i64 = cleaned.parse().ok()?;
        Some(json!(parsed))
    }
}

fn coerce_str(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        // The model occasionally returns a number for an address-ish
        // field; stringify rather than drop.
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::field;

    fn options() -> Vec<IndustryOption> {
        vec![
            IndustryOption { id: 7, label: "Technology".into() },
            IndustryOption { id: 3, label: "Logistics".into() },
        ]
    }

    #[test]
    fn number_parsing() {
        let f = field("employee_count").unwrap();
        assert_eq!(format_value(f, &json!("1,234"), &[]), Some(json!(1234)));
        assert_eq!(format_value(f, &json!("1234.5"), &[]), Some(json!(1234.5)));
        assert_eq!(format_value(f, &json!(250), &[]), Some(json!(250)));
        assert_eq!(format_value(f, &json!(""), &[]), None);
        assert_eq!(format_value(f, &json!("abc"), &[]), None);
        assert_eq!(format_value(f, &json!("~500 people"), &[]), Some(json!(500)));
    }

    #[test]
    fn enum_match_is_case_insensitive() {
        let f = field("industry").unwrap();
        assert_eq!(format_value(f, &json!("technology"), &options()), Some(json!(7)));
        assert_eq!(format_value(f, &json!("LOGISTICS"), &options()), Some(json!(3)));
        assert_eq!(format_value(f, &json!("Aerospace"), &options()), None);
    }

    #[test]
    fn phone_and_email_get_list_shape() {
        let phone = field("phone").unwrap();
        assert_eq!(
            format_value(phone, &json!("+49 30 1234"), &[]),
            Some(json!([{ "value": "+49 30 1234", "primary": true, "label": "work" }]))
        );
        let email = field("email").unwrap();
        assert_eq!(format_value(email, &json!("  "), &[]), None);
    }

    #[test]
    fn text_is_trimmed_and_blank_rejected() {
        let f = field("description").unwrap();
        assert_eq!(format_value(f, &json!("  hi  "), &[]), Some(json!("hi")));
        assert_eq!(format_value(f, &json!("   "), &[]), None);
        assert_eq!(format_value(f, &Value::Null, &[]), None);
    }
}
