//! Static field registry.
//!
//! One canonical mapping from logical field names to provider keys and
//! value types, loaded once and immutable thereafter. Pipedrive custom
//! fields are addressed by opaque 40-char hash keys; built-in fields by
//! their plain names.

use serde::Deserialize;

/// How a field's extracted value must be shaped for the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, stored as-is after trimming.
    Text,

    /// Integer or float; the provider rejects formatted strings.
    Number,

    /// List-of-{value, primary, label} shape.
    Phone,

    /// Same list shape as phone.
    Email,

    /// Closed option set; stored as the option's numeric id.
    Enum,

    /// Postal address as a single line.
    Address,
}

/// A single entry in the field registry.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Logical name used in prompts, model responses, and reports.
    pub logical_name: &'static str,

    /// Provider-side key (custom field hash or built-in name).
    pub provider_key: &'static str,

    pub kind: FieldKind,

    /// Human-readable label, shown to the model as context.
    pub label: &'static str,

    /// Whether pass 2 (open web search) may attempt this field.
    pub web_searchable: bool,
}

/// Fields the populate flow may fill on an organization record.
pub const ORGANIZATION_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor {
        logical_name: "industry",
        provider_key: "3f9e5c1b7a2d8f04c6e1b9a35d7f20c48e6a1b3d",
        kind: FieldKind::Enum,
        label: "Industry",
        web_searchable: true,
    },
    FieldDescriptor {
        logical_name: "phone",
        provider_key: "b81c2f6e9d40a3571c8e2b6f0d94a7e31f5c8d02",
        kind: FieldKind::Phone,
        label: "Phone number",
        web_searchable: true,
    },
    FieldDescriptor {
        logical_name: "email",
        provider_key: "7d02e4a8c1f6b3950e7a2c4d8b1f6e03a9c5d7b1",
        kind: FieldKind::Email,
        label: "Contact email",
        web_searchable: true,
    },
    FieldDescriptor {
        logical_name: "address",
        provider_key: "address",
        kind: FieldKind::Address,
        label: "Headquarters address",
        web_searchable: false,
    },
    FieldDescriptor {
        logical_name: "employee_count",
        provider_key: "e5b07c3a9f14d6820b5e9c3a7f12d48b0c6e9a24",
        kind: FieldKind::Number,
        label: "Number of employees",
        web_searchable: true,
    },
    FieldDescriptor {
        logical_name: "founded_year",
        provider_key: "4a8d1e6b3c90f7251a4d8e6b2c93f0571e8b4a6c",
        kind: FieldKind::Number,
        label: "Year founded",
        web_searchable: true,
    },
    FieldDescriptor {
        logical_name: "description",
        provider_key: "c2e96a4d7b10f8532c6e9a4b7d12f0863a5c8e1f",
        kind: FieldKind::Text,
        label: "Short company description",
        web_searchable: false,
    },
];

/// The provider key of the deal summary custom field (write-back target
/// for `resource: "deal"`).
pub const DEAL_SUMMARY_KEY: &str = "8f3a6c1e9b47d2051f8a3c6e0b94d7251c8f3a60";

/// Look up a field descriptor by logical name.
pub fn field(logical_name: &str) -> Option<&'static FieldDescriptor> {
    ORGANIZATION_FIELDS
        .iter()
        .find(|f| f.logical_name == logical_name)
}

/// One choice of the industry enum, fetched on demand from the CRM's
/// field metadata. Not cached across requests.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IndustryOption {
    pub id: i64,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_names_are_unique() {
        for (i, a) in ORGANIZATION_FIELDS.iter().enumerate() {
            for b in &ORGANIZATION_FIELDS[i + 1..] {
                assert_ne!(a.logical_name, b.logical_name);
                assert_ne!(a.provider_key, b.provider_key);
            }
        }
    }

    #[test]
    fn lookup_by_logical_name() {
        let industry = field("industry").unwrap();
        assert_eq!(industry.kind, FieldKind::Enum);
        assert!(industry.web_searchable);

        assert!(field("does_not_exist").is_none());
    }
}
