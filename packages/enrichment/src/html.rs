//! Best-effort HTML to plain text reduction and page fetching.
//!
//! The stripper is deliberately minimal: it is not HTML-spec compliant and
//! does not handle malformed markup or nested-comment edge cases. Its only
//! job is producing prompt material, where "mostly the visible text" is
//! good enough. Known limitation, not a bug to fix.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use crate::traits::SiteFetcher;

/// Maximum plain-text length passed to the model per page.
pub const MAX_TEXT_LEN: usize = 10_000;

/// How long a single page fetch may take before being abandoned.
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

fn script_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap())
}

fn style_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap())
}

/// Reduce raw HTML to plain text, capped at [`MAX_TEXT_LEN`] characters.
///
/// Script and style blocks are removed first so their inner text is never
/// exposed, then remaining tags are dropped by tracking an "inside a tag"
/// flag, then whitespace runs collapse to single spaces.
pub fn extract_text(raw_html: &str) -> String {
    let without_scripts = script_pattern().replace_all(raw_html, " ");
    let without_styles = style_pattern().replace_all(&without_scripts, " ");

    let mut text = String::with_capacity(without_styles.len() / 2);
    let mut inside_tag = false;
    for ch in without_styles.chars() {
        match ch {
            '<' => inside_tag = true,
            '>' => {
                inside_tag = false;
                // Tag boundaries separate words ("</td><td>").
                text.push(' ');
            }
            c if !inside_tag => text.push(c),
            _ => {}
        }
    }

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_TEXT_LEN).collect()
}

/// Ensure a website value from the CRM is a fetchable URL.
///
/// Records frequently hold bare domains ("acme.de"); default to https.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// reqwest-backed [`SiteFetcher`].
///
/// Any failure (network error, non-200, body read error) yields empty
/// text; the pipeline treats empty/short text as "could not read site".
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            user_agent: "Mozilla/5.0 (compatible; FieldEnrichBot/1.0)".to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[async_trait]
impl SiteFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> String {
        let url = normalize_url(url);
        debug!(url = %url, "fetching page");

        let response = match self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(url = %url, error = %e, "page fetch failed");
                return String::new();
            }
        };

        if !response.status().is_success() {
            warn!(url = %url, status = %response.status(), "page fetch returned non-success");
            return String::new();
        }

        match response.text().await {
            Ok(html) => extract_text(&html),
            Err(e) => {
                warn!(url = %url, error = %e, "failed to read page body");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_collapses_whitespace() {
        let html = "<html><body><h1>Acme   GmbH</h1>\n<p>We move\nboxes.</p></body></html>";
        assert_eq!(extract_text(html), "Acme GmbH We move boxes.");
    }

    #[test]
    fn script_and_style_content_never_leaks() {
        let html = r#"<head><style>.x { color: red }</style>
            <script type="text/javascript">var secret = "token";</script></head>
            <body>Visible</body>"#;
        let text = extract_text(html);
        assert_eq!(text, "Visible");
        assert!(!text.contains("secret"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn case_insensitive_script_removal() {
        let html = "<SCRIPT>alert(1)</SCRIPT>ok";
        assert_eq!(extract_text(html), "ok");
    }

    #[test]
    fn output_is_capped() {
        let html = format!("<p>{}</p>", "a".repeat(MAX_TEXT_LEN * 2));
        assert_eq!(extract_text(&html).len(), MAX_TEXT_LEN);
    }

    #[test]
    fn normalize_url_defaults_to_https() {
        assert_eq!(normalize_url("acme.de"), "https://acme.de");
        assert_eq!(normalize_url(" http://acme.de "), "http://acme.de");
        assert_eq!(normalize_url("https://acme.de"), "https://acme.de");
    }
}
