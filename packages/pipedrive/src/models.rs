//! Wire types for the Pipedrive v1 API.
//!
//! Records carry an open-ended set of custom fields keyed by opaque hash
//! strings, so the typed structs keep the handful of fields the service
//! reads by name and flatten the rest into a raw map.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Standard `{success, data}` envelope around every v1 response.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload. A body the API itself marked `success: false`
    /// is rejected even when it carries data.
    pub(crate) fn into_data(self, path: &str) -> crate::Result<Option<T>> {
        if !self.success {
            return Err(crate::PipedriveError::Shape(format!(
                "success=false for {}",
                path
            )));
        }
        Ok(self.data)
    }
}

/// An organization record. Custom fields land in `fields`.
#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Organization {
    /// The record's website, if any of the conventional keys holds one.
    pub fn website(&self) -> Option<String> {
        ["website", "url", "web"]
            .iter()
            .filter_map(|key| self.fields.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(String::from)
    }
}

/// A deal record.
#[derive(Debug, Clone, Deserialize)]
pub struct Deal {
    pub id: i64,
    pub title: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Deal {
    /// The linked organization id. v1 returns `org_id` either as a bare
    /// number or as an object with a `value` sub-field.
    pub fn org_id(&self) -> Option<i64> {
        match self.fields.get("org_id")? {
            Value::Number(n) => n.as_i64(),
            Value::Object(o) => o.get("value").and_then(Value::as_i64),
            _ => None,
        }
    }
}

/// A note attached to a deal.
#[derive(Debug, Clone, Deserialize)]
pub struct Note {
    pub id: i64,
    #[serde(default)]
    pub content: String,
    /// "YYYY-MM-DD HH:MM:SS" as reported by the API.
    #[serde(default)]
    pub add_time: String,
}

/// Field metadata, used to resolve enum option sets.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMeta {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub options: Option<Vec<FieldOption>>,
}

/// One option of an enum field.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FieldOption {
    pub id: i64,
    pub label: String,
}

/// OAuth token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub api_domain: Option<String>,
}

/// Authenticated identity (`GET /users/me`).
#[derive(Debug, Clone, Deserialize)]
pub struct Me {
    pub id: i64,
    pub name: String,
    pub company_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn org_id_both_shapes() {
        let flat: Deal =
            serde_json::from_value(json!({"id": 1, "title": "t", "org_id": 42})).unwrap();
        assert_eq!(flat.org_id(), Some(42));

        let nested: Deal = serde_json::from_value(
            json!({"id": 1, "title": "t", "org_id": {"name": "Acme", "value": 42}}),
        )
        .unwrap();
        assert_eq!(nested.org_id(), Some(42));

        let missing: Deal = serde_json::from_value(json!({"id": 1, "title": "t"})).unwrap();
        assert_eq!(missing.org_id(), None);
    }

    #[test]
    fn envelope_rejects_bodies_the_api_marked_failed() {
        let ok: Envelope<i64> =
            serde_json::from_value(json!({"success": true, "data": 7})).unwrap();
        assert_eq!(ok.into_data("/x").unwrap(), Some(7));

        let failed: Envelope<i64> =
            serde_json::from_value(json!({"success": false, "data": 7})).unwrap();
        assert!(matches!(
            failed.into_data("/x"),
            Err(crate::PipedriveError::Shape(_))
        ));
    }

    #[test]
    fn website_lookup_skips_blank_values() {
        let org: Organization = serde_json::from_value(
            json!({"id": 5, "name": "Acme", "website": "  ", "url": "acme.de"}),
        )
        .unwrap();
        assert_eq!(org.website().as_deref(), Some("acme.de"));
    }
}
