//! OpenAI implementation of the extractor traits.
//!
//! The grounded pass uses plain chat completions; the search pass uses the
//! search-preview model with `web_search_options` enabled so the model can
//! consult the open web. Responses are parsed as JSON objects keyed by
//! logical field name, with a markdown code-fence fallback.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EnrichmentError, Result};
use crate::pipeline::Subject;
use crate::prompts;
use crate::registry::{FieldDescriptor, IndustryOption};
use crate::traits::{DealSummarizer, FieldExtractor};

/// OpenAI-based extractor.
///
/// Uses gpt-4o for grounded extraction and summaries, and the search
/// preview model for the web-search pass.
#[derive(Clone)]
pub struct OpenAI {
    client: Client,
    api_key: String,
    model: String,
    search_model: String,
    base_url: String,
}

impl OpenAI {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            api_key: api_key.into(),
            model: "gpt-4o".to_string(),
            search_model: "gpt-4o-search-preview".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| EnrichmentError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set the chat model (default: gpt-4o).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the web-search model (default: gpt-4o-search-preview).
    pub fn with_search_model(mut self, model: impl Into<String>) -> Self {
        self.search_model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Generic chat completion (for callers outside the pipeline, e.g.
    /// the exercise generator).
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.chat(system, user, false).await
    }

    /// Make a chat completion request.
    async fn chat(&self, system: &str, user: &str, web_search: bool) -> Result<String> {
        let request = ChatRequest {
            model: if web_search {
                self.search_model.clone()
            } else {
                self.model.clone()
            },
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            // The search model does not accept a temperature override.
            temperature: if web_search { None } else { Some(0.0) },
            max_tokens: Some(1024),
            web_search_options: if web_search {
                Some(serde_json::json!({}))
            } else {
                None
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| EnrichmentError::AI(Box::new(e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::AI(
                format!("OpenAI API error: {}", error_text).into(),
            ));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::AI(Box::new(e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| EnrichmentError::AI("No response from OpenAI".into()))
    }

    /// Parse a model response into a field map, keeping only requested
    /// fields and dropping explicit nulls. Numeric 0 and other falsy
    /// values survive; only null/absence means "not found".
    fn parse_field_map(
        response: &str,
        fields: &[&'static FieldDescriptor],
    ) -> Result<HashMap<String, Value>> {
        let parsed: Value = serde_json::from_str(response)
            .or_else(|_| serde_json::from_str(prompts::strip_code_fences(response)))
            .map_err(EnrichmentError::JsonParse)?;

        let object = parsed.as_object().ok_or_else(|| {
            EnrichmentError::AI("Extraction response is not a JSON object".into())
        })?;

        Ok(object
            .iter()
            .filter(|(key, value)| {
                !value.is_null() && fields.iter().any(|f| f.logical_name == key.as_str())
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

#[async_trait]
impl FieldExtractor for OpenAI {
    async fn extract_from_text(
        &self,
        subject: &Subject,
        site_text: &str,
        fields: &[&'static FieldDescriptor],
        industry_options: &[IndustryOption],
    ) -> Result<HashMap<String, Value>> {
        let website = subject.website.as_deref().unwrap_or("");
        let user = prompts::format_grounded_prompt(
            &subject.name,
            website,
            site_text,
            fields,
            industry_options,
        );

        let response = self.chat(prompts::GROUNDED_SYSTEM, &user, false).await?;
        Self::parse_field_map(&response, fields)
    }

    async fn extract_from_web(
        &self,
        subject: &Subject,
        fields: &[&'static FieldDescriptor],
        industry_options: &[IndustryOption],
    ) -> Result<HashMap<String, Value>> {
        let domain = subject
            .domain()
            .unwrap_or_else(|| subject.name.to_lowercase().replace(' ', ""));
        let user =
            prompts::format_search_prompt(&subject.name, &domain, fields, industry_options);

        let response = self.chat(prompts::SEARCH_SYSTEM, &user, true).await?;
        Self::parse_field_map(&response, fields)
    }
}

#[async_trait]
impl DealSummarizer for OpenAI {
    async fn summarize_deal(
        &self,
        deal_title: &str,
        org_name: &str,
        site_text: &str,
        notes: &[String],
    ) -> Result<String> {
        let user = prompts::format_deal_summary_prompt(deal_title, org_name, site_text, notes);
        let response = self
            .chat("You are a concise CRM assistant.", &user, false)
            .await?;
        Ok(response.trim().to_string())
    }
}

// Request/Response types

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_search_options: Option<Value>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ORGANIZATION_FIELDS;
    use serde_json::json;

    #[test]
    fn test_openai_builder() {
        let ai = OpenAI::new("sk-test")
            .with_model("gpt-4o-mini")
            .with_search_model("gpt-4o-mini-search-preview")
            .with_base_url("https://custom.api.com");

        assert_eq!(ai.model, "gpt-4o-mini");
        assert_eq!(ai.search_model, "gpt-4o-mini-search-preview");
        assert_eq!(ai.base_url, "https://custom.api.com");
    }

    #[test]
    fn parse_drops_nulls_and_unknown_keys_but_keeps_zero() {
        let fields: Vec<_> = ORGANIZATION_FIELDS.iter().collect();
        let response = r#"{"industry": "Logistics", "phone": null, "bogus": 1, "employee_count": 0}"#;

        let map = OpenAI::parse_field_map(response, &fields).unwrap();
        assert_eq!(map.get("industry"), Some(&json!("Logistics")));
        assert_eq!(map.get("employee_count"), Some(&json!(0)));
        assert!(!map.contains_key("phone"));
        assert!(!map.contains_key("bogus"));
    }

    #[test]
    fn parse_handles_code_fences() {
        let fields: Vec<_> = ORGANIZATION_FIELDS.iter().collect();
        let response = "```json\n{\"industry\": \"Technology\"}\n```";

        let map = OpenAI::parse_field_map(response, &fields).unwrap();
        assert_eq!(map.get("industry"), Some(&json!("Technology")));
    }

    #[test]
    fn parse_rejects_non_objects() {
        let fields: Vec<_> = ORGANIZATION_FIELDS.iter().collect();
        assert!(OpenAI::parse_field_map("[1, 2]", &fields).is_err());
        assert!(OpenAI::parse_field_map("not json", &fields).is_err());
    }
}
