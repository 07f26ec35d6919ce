//! Thin typed client for the Pipedrive CRM REST API.
//!
//! Stateless beyond the underlying HTTP client: every call takes the
//! tenant's access token, so one instance serves all tenants. Calls use a
//! bounded timeout and are never retried — a non-success response becomes
//! [`PipedriveError::Api`] with the upstream body preserved for the caller
//! to surface.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

pub mod models;

pub use models::{Deal, FieldMeta, FieldOption, Me, Note, Organization, TokenResponse};

use models::Envelope;

const API_BASE: &str = "https://api.pipedrive.com/v1";
const OAUTH_BASE: &str = "https://oauth.pipedrive.com";
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the Pipedrive API.
#[derive(Debug, Error)]
pub enum PipedriveError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response; `body` is the upstream error body verbatim
    #[error("Pipedrive API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Response parsed but did not carry the expected data
    #[error("unexpected Pipedrive response: {0}")]
    Shape(String),
}

pub type Result<T> = std::result::Result<T, PipedriveError>;

/// Pipedrive API client.
#[derive(Clone)]
pub struct Pipedrive {
    client: reqwest::Client,
    api_base: String,
    oauth_base: String,
}

impl Default for Pipedrive {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipedrive {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(API_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            api_base: API_BASE.to_string(),
            oauth_base: OAUTH_BASE.to_string(),
        }
    }

    /// Override the API base URL (for tests).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Override the OAuth base URL (for tests).
    pub fn with_oauth_base(mut self, base: impl Into<String>) -> Self {
        self.oauth_base = base.into();
        self
    }

    /// The provider's authorize endpoint for the OAuth redirect.
    pub fn authorize_url(&self, client_id: &str, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}/oauth/authorize?client_id={}&redirect_uri={}&state={}",
            self.oauth_base,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state),
        )
    }

    // =========================================================================
    // Records
    // =========================================================================

    pub async fn get_organization(&self, token: &str, id: i64) -> Result<Organization> {
        self.get(token, &format!("/organizations/{}", id)).await
    }

    pub async fn get_deal(&self, token: &str, id: i64) -> Result<Deal> {
        self.get(token, &format!("/deals/{}", id)).await
    }

    /// Notes attached to a deal, newest first as the API returns them.
    pub async fn list_deal_notes(&self, token: &str, deal_id: i64) -> Result<Vec<Note>> {
        let notes: Option<Vec<Note>> = self
            .get_optional(token, &format!("/notes?deal_id={}&limit=100", deal_id))
            .await?;
        // data is null (not an empty list) when a deal has no notes.
        Ok(notes.unwrap_or_default())
    }

    /// Single update call covering all resolved fields.
    pub async fn update_organization(
        &self,
        token: &str,
        id: i64,
        payload: &Map<String, Value>,
    ) -> Result<()> {
        self.put(token, &format!("/organizations/{}", id), payload).await
    }

    pub async fn update_deal(
        &self,
        token: &str,
        id: i64,
        payload: &Map<String, Value>,
    ) -> Result<()> {
        self.put(token, &format!("/deals/{}", id), payload).await
    }

    /// Resolve the option set of an organization enum field by key.
    pub async fn organization_field_options(
        &self,
        token: &str,
        field_key: &str,
    ) -> Result<Vec<FieldOption>> {
        let fields: Vec<FieldMeta> = self
            .get(token, "/organizationFields?limit=500")
            .await?;

        fields
            .into_iter()
            .find(|f| f.key == field_key)
            .and_then(|f| f.options)
            .ok_or_else(|| {
                PipedriveError::Shape(format!("no option set for field key {}", field_key))
            })
    }

    /// Authenticated tenant identity.
    pub async fn me(&self, token: &str) -> Result<Me> {
        self.get(token, "/users/me").await
    }

    // =========================================================================
    // OAuth
    // =========================================================================

    /// Exchange an authorization code for a token pair. One-shot: a code
    /// cannot be replayed, so there is no point retrying.
    pub async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse> {
        self.token_request(
            client_id,
            client_secret,
            &[("grant_type", "authorization_code"), ("code", code), ("redirect_uri", redirect_uri)],
        )
        .await
    }

    /// Trade a refresh token for a fresh access/refresh pair.
    pub async fn refresh_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<TokenResponse> {
        self.token_request(
            client_id,
            client_secret,
            &[("grant_type", "refresh_token"), ("refresh_token", refresh_token)],
        )
        .await
    }

    async fn token_request(
        &self,
        client_id: &str,
        client_secret: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse> {
        let response = self
            .client
            .post(format!("{}/oauth/token", self.oauth_base))
            .basic_auth(client_id, Some(client_secret))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipedriveError::Api { status: status.as_u16(), body });
        }

        Ok(response.json().await?)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    async fn get<T: DeserializeOwned>(&self, token: &str, path: &str) -> Result<T> {
        self.get_optional(token, path)
            .await?
            .ok_or_else(|| PipedriveError::Shape(format!("empty data for GET {}", path)))
    }

    async fn get_optional<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
    ) -> Result<Option<T>> {
        debug!(path = %path, "pipedrive GET");
        let response = self
            .client
            .get(format!("{}{}", self.api_base, path))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipedriveError::Api { status: status.as_u16(), body });
        }

        let envelope: Envelope<T> = response.json().await?;
        envelope.into_data(path)
    }

    async fn put(&self, token: &str, path: &str, payload: &Map<String, Value>) -> Result<()> {
        debug!(path = %path, keys = payload.len(), "pipedrive PUT");
        let response = self
            .client
            .put(format!("{}{}", self.api_base, path))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipedriveError::Api { status: status.as_u16(), body });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_encodes_parameters() {
        let client = Pipedrive::new();
        let url = client.authorize_url(
            "abc123",
            "https://example.com/oauth/callback",
            "state token",
        );
        assert!(url.starts_with("https://oauth.pipedrive.com/oauth/authorize?"));
        assert!(url.contains("client_id=abc123"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fexample.com%2Foauth%2Fcallback"));
        assert!(url.contains("state=state%20token"));
    }

    #[test]
    fn base_overrides() {
        let client = Pipedrive::new()
            .with_api_base("http://localhost:9999/v1")
            .with_oauth_base("http://localhost:9999");
        assert!(client
            .authorize_url("id", "cb", "s")
            .starts_with("http://localhost:9999/oauth/authorize"));
    }
}
