use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub openai_api_key: String,
    /// Missing CRM credentials are not fatal at startup: the OAuth routes
    /// surface them as 500s, everything else still works.
    pub pipedrive_client_id: Option<String>,
    pub pipedrive_client_secret: Option<String>,
    /// Public base URL this service is reachable at, used to build the
    /// OAuth callback URL.
    pub base_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://enrich.db?mode=rwc".to_string()),
            port,
            openai_api_key: env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set")?,
            pipedrive_client_id: env::var("PIPEDRIVE_CLIENT_ID").ok(),
            pipedrive_client_secret: env::var("PIPEDRIVE_CLIENT_SECRET").ok(),
            base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
        })
    }

    /// Both CRM credentials, or a config error naming the missing one.
    pub fn pipedrive_credentials(&self) -> std::result::Result<(&str, &str), &'static str> {
        let id = self
            .pipedrive_client_id
            .as_deref()
            .ok_or("PIPEDRIVE_CLIENT_ID is not configured")?;
        let secret = self
            .pipedrive_client_secret
            .as_deref()
            .ok_or("PIPEDRIVE_CLIENT_SECRET is not configured")?;
        Ok((id, secret))
    }

    pub fn callback_url(&self) -> String {
        format!("{}/oauth/callback", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            database_url: "sqlite::memory:".into(),
            port: 8080,
            openai_api_key: "sk-test".into(),
            pipedrive_client_id: None,
            pipedrive_client_secret: None,
            base_url: "https://enrich.example.com/".into(),
        }
    }

    #[test]
    fn callback_url_has_no_double_slash() {
        assert_eq!(
            config().callback_url(),
            "https://enrich.example.com/oauth/callback"
        );
    }

    #[test]
    fn credentials_report_what_is_missing() {
        let mut c = config();
        assert!(c.pipedrive_credentials().unwrap_err().contains("CLIENT_ID"));
        c.pipedrive_client_id = Some("id".into());
        assert!(c.pipedrive_credentials().unwrap_err().contains("SECRET"));
        c.pipedrive_client_secret = Some("secret".into());
        assert_eq!(c.pipedrive_credentials().unwrap(), ("id", "secret"));
    }
}
