//! LLM prompts for the enrichment pipeline.
//!
//! The instruction block built here is embedded verbatim into every
//! extraction request. Because the model executes the extraction logic,
//! this text is the specification of correctness for each field; the only
//! downstream gate is the value formatter.

use crate::registry::{FieldDescriptor, FieldKind, IndustryOption};

/// System prompt for the grounded extraction pass.
pub const GROUNDED_SYSTEM: &str = r#"You are a data extraction assistant for a CRM.
You are given the plain text of a company's own website and a list of fields to fill.

Rules:
- Use ONLY facts stated in the provided text. Do not use outside knowledge.
- Return null for any field the text does not answer. NEVER invent a value.
- Output a single JSON object keyed by the field names, nothing else."#;

/// System prompt for the web-search pass.
pub const SEARCH_SYSTEM: &str = r#"You are a data extraction assistant for a CRM with web search enabled.
You research one specific company and fill the listed fields.

Rules:
- Before accepting any search result, verify it names BOTH the company and its
  website domain. If you cannot verify both, the result is about a different
  company: return null for that field.
- Return null on any ambiguity or conflict between sources. NEVER guess.
- Output a single JSON object keyed by the field names, nothing else."#;

/// User prompt template for the grounded pass.
const GROUNDED_USER: &str = r#"Company: {name}
Website: {website}

Fill these fields from the website text below:
{instructions}

Website text:
{text}

Output JSON only."#;

/// User prompt template for the search pass.
const SEARCH_USER: &str = r#"Company: {name}
Website domain: {domain}

Research the company and fill these fields:
{instructions}

Suggested searches:
{queries}

Remember: a result counts only if it names both "{name}" and the domain {domain}.
Output JSON only."#;

/// Prompt template for the deal summary write-back.
const DEAL_SUMMARY: &str = r#"Write a short summary (3-5 sentences, plain prose, no headings) of the
sales deal below for a CRM field. Cover who the company is, what the deal
is about, and anything actionable from the notes. Stick to the facts given.

Deal: {title}
Company: {org}

Company website text:
{text}

Notes in the selected period:
{notes}"#;

/// Build the per-field instruction block.
///
/// One line per field: expected output type, formatting rule, and the
/// mandatory "null if not found" policy carried by the system prompt.
/// The enum field lists its closed label set and forbids anything outside it.
pub fn field_instructions(
    fields: &[&'static FieldDescriptor],
    industry_options: &[IndustryOption],
) -> String {
    fields
        .iter()
        .map(|f| {
            let rule = match f.kind {
                FieldKind::Text => {
                    "free text, at most one short paragraph".to_string()
                }
                FieldKind::Number => {
                    "a plain JSON number (no thousands separators, no units)".to_string()
                }
                FieldKind::Phone => {
                    "one phone number as a string, international format if shown".to_string()
                }
                FieldKind::Email => "one email address as a string".to_string(),
                FieldKind::Address => {
                    "the full postal address as a single-line string".to_string()
                }
                FieldKind::Enum => {
                    let labels = industry_options
                        .iter()
                        .map(|o| format!("\"{}\"", o.label))
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!(
                        "exactly one of these labels: [{}]. Any value outside this list is forbidden; if none fits, return null",
                        labels
                    )
                }
            };
            format!("- \"{}\" ({}): {}", f.logical_name, f.label, rule)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the grounded-pass user prompt.
pub fn format_grounded_prompt(
    name: &str,
    website: &str,
    site_text: &str,
    fields: &[&'static FieldDescriptor],
    industry_options: &[IndustryOption],
) -> String {
    GROUNDED_USER
        .replace("{name}", name)
        .replace("{website}", website)
        .replace("{instructions}", &field_instructions(fields, industry_options))
        .replace("{text}", site_text)
}

/// Format the search-pass user prompt with per-field targeted queries.
pub fn format_search_prompt(
    name: &str,
    domain: &str,
    fields: &[&'static FieldDescriptor],
    industry_options: &[IndustryOption],
) -> String {
    let queries = fields
        .iter()
        .map(|f| format!("- {}: \"{}\" {} {}", f.logical_name, name, domain, f.label))
        .collect::<Vec<_>>()
        .join("\n");

    SEARCH_USER
        .replace("{instructions}", &field_instructions(fields, industry_options))
        .replace("{queries}", &queries)
        .replace("{domain}", domain)
        .replace("{name}", name)
}

/// Format the deal summary prompt.
pub fn format_deal_summary_prompt(
    title: &str,
    org: &str,
    site_text: &str,
    notes: &[String],
) -> String {
    let notes_text = if notes.is_empty() {
        "(no notes in this period)".to_string()
    } else {
        notes
            .iter()
            .map(|n| format!("- {}", n))
            .collect::<Vec<_>>()
            .join("\n")
    };

    DEAL_SUMMARY
        .replace("{title}", title)
        .replace("{org}", org)
        .replace("{text}", site_text)
        .replace("{notes}", &notes_text)
}

/// Strip a markdown code fence from a model response, if present.
///
/// Models wrap JSON in ```json fences often enough that every parse site
/// needs this fallback.
pub fn strip_code_fences(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}
