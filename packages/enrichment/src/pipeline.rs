//! The two-pass enrichment engine.
//!
//! Per populate request, strictly sequential: resolve targets → fetch site
//! text → grounded pass → residual set → search pass → merge → format.
//! Each step depends on the previous step's output; there is no
//! intra-request parallelism and no cancellation path. Runs to completion
//! or to the first unrecoverable error.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::emptiness::is_empty;
use crate::error::{EnrichmentError, Result};
use crate::format::format_value;
use crate::registry::{FieldDescriptor, IndustryOption, ORGANIZATION_FIELDS};
use crate::traits::{FieldExtractor, SiteFetcher};

/// Minimum plain-text length for the grounded pass. Shorter page text is
/// treated as "could not read source" and fails the request.
pub const MIN_SITE_TEXT_LEN: usize = 100;

/// The record being enriched, as far as the pipeline needs to know it.
#[derive(Debug, Clone)]
pub struct Subject {
    pub name: String,
    pub website: Option<String>,
}

impl Subject {
    /// The website's host, used in search queries and verification rules.
    pub fn domain(&self) -> Option<String> {
        let website = self.website.as_deref()?;
        url::Url::parse(&crate::html::normalize_url(website))
            .ok()?
            .host_str()
            .map(|h| h.trim_start_matches("www.").to_string())
    }
}

/// Which pass satisfied a field, or that none did.
#[derive(Debug, Default)]
pub struct EnrichmentOutcome {
    /// Provider key → formatted value, ready for a single update call.
    pub payload: Map<String, Value>,

    /// Logical names filled by the grounded pass.
    pub filled_from_site: Vec<String>,

    /// Logical names filled by the web-search pass.
    pub filled_from_web: Vec<String>,

    /// Logical names no pass could resolve (or that failed formatting).
    pub not_found: Vec<String>,

    /// Logical names that were empty and therefore targeted.
    pub targets: Vec<String>,
}

impl EnrichmentOutcome {
    /// True when every field was already filled and no work was done.
    pub fn nothing_to_do(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Orchestrates the two extraction passes over the trait seams.
pub struct Enricher {
    extractor: Arc<dyn FieldExtractor>,
    fetcher: Arc<dyn SiteFetcher>,
}

impl Enricher {
    pub fn new(extractor: Arc<dyn FieldExtractor>, fetcher: Arc<dyn SiteFetcher>) -> Self {
        Self { extractor, fetcher }
    }

    /// Run the pipeline for one organization record.
    ///
    /// `current` is the record's raw field map from the CRM; targets are
    /// the registry fields whose current value is empty. The caller
    /// performs the write-through with the returned payload.
    pub async fn enrich(
        &self,
        subject: &Subject,
        current: &Map<String, Value>,
        industry_options: &[IndustryOption],
    ) -> Result<EnrichmentOutcome> {
        // Step 1: resolve target fields.
        let targets: Vec<&'static FieldDescriptor> = ORGANIZATION_FIELDS
            .iter()
            .filter(|f| is_empty(current.get(f.provider_key).unwrap_or(&Value::Null)))
            .collect();

        let mut outcome = EnrichmentOutcome {
            targets: targets.iter().map(|f| f.logical_name.to_string()).collect(),
            ..Default::default()
        };

        // Step 2: guard.
        if targets.is_empty() {
            info!(org = %subject.name, "all fields filled, nothing to do");
            return Ok(outcome);
        }

        debug!(org = %subject.name, targets = ?outcome.targets, "resolved target fields");

        // Step 3: acquire source material. Page content is mandatory for
        // pass 1 when the subject has a declared website; with no website
        // and nothing web-searchable there is no source at all.
        let site_text = match subject.website.as_deref().filter(|w| !w.trim().is_empty()) {
            Some(website) => {
                let text = self.fetcher.fetch_text(website).await;
                if text.len() < MIN_SITE_TEXT_LEN {
                    return Err(EnrichmentError::SourceUnreadable(format!(
                        "could not read website content from {}",
                        website
                    )));
                }
                Some(text)
            }
            None => {
                if !targets.iter().any(|f| f.web_searchable) {
                    return Err(EnrichmentError::SourceUnreadable(
                        "no website found on the record".to_string(),
                    ));
                }
                None
            }
        };

        // Step 4: grounded pass. An LLM failure here is unrecoverable.
        let pass1: HashMap<String, Value> = match &site_text {
            Some(text) => {
                self.extractor
                    .extract_from_text(subject, text, &targets, industry_options)
                    .await?
            }
            None => HashMap::new(),
        };
        debug!(org = %subject.name, found = pass1.len(), "grounded pass complete");

        // Step 5: residual set.
        let residual: Vec<&'static FieldDescriptor> = targets
            .iter()
            .copied()
            .filter(|f| f.web_searchable && !pass1.contains_key(f.logical_name))
            .collect();

        // Step 6: search pass, best-effort. Errors here never abort the
        // request; affected fields just stay missing.
        let pass2: HashMap<String, Value> = if residual.is_empty() {
            HashMap::new()
        } else {
            match self
                .extractor
                .extract_from_web(subject, &residual, industry_options)
                .await
            {
                Ok(found) => found,
                Err(e) => {
                    warn!(org = %subject.name, error = %e, "web search pass failed, continuing");
                    HashMap::new()
                }
            }
        };

        // Steps 7+8: merge with pass-1 precedence, then format. Values
        // that fail formatting count as not found.
        for field in &targets {
            let name = field.logical_name;
            let (raw, from_site) = match pass1.get(name) {
                Some(v) => (Some(v), true),
                None => (pass2.get(name), false),
            };

            let formatted = raw.and_then(|v| format_value(field, v, industry_options));
            match formatted {
                Some(value) => {
                    outcome.payload.insert(field.provider_key.to_string(), value);
                    if from_site {
                        outcome.filled_from_site.push(name.to_string());
                    } else {
                        outcome.filled_from_web.push(name.to_string());
                    }
                }
                None => outcome.not_found.push(name.to_string()),
            }
        }

        info!(
            org = %subject.name,
            from_site = outcome.filled_from_site.len(),
            from_web = outcome.filled_from_web.len(),
            not_found = outcome.not_found.len(),
            "enrichment complete"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockExtractor {
        pass1: HashMap<String, Value>,
        pass2: HashMap<String, Value>,
        pass2_fails: bool,
        pass1_calls: AtomicUsize,
        pass2_calls: AtomicUsize,
    }

    impl MockExtractor {
        fn new(pass1: HashMap<String, Value>, pass2: HashMap<String, Value>) -> Self {
            Self {
                pass1,
                pass2,
                pass2_fails: false,
                pass1_calls: AtomicUsize::new(0),
                pass2_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl FieldExtractor for MockExtractor {
        async fn extract_from_text(
            &self,
            _subject: &Subject,
            _site_text: &str,
            fields: &[&'static FieldDescriptor],
            _options: &[IndustryOption],
        ) -> Result<HashMap<String, Value>> {
            self.pass1_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .pass1
                .iter()
                .filter(|(k, _)| fields.iter().any(|f| f.logical_name == k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect())
        }

        async fn extract_from_web(
            &self,
            _subject: &Subject,
            fields: &[&'static FieldDescriptor],
            _options: &[IndustryOption],
        ) -> Result<HashMap<String, Value>> {
            self.pass2_calls.fetch_add(1, Ordering::SeqCst);
            if self.pass2_fails {
                return Err(EnrichmentError::AI("search unavailable".to_string().into()));
            }
            Ok(self
                .pass2
                .iter()
                .filter(|(k, _)| fields.iter().any(|f| f.logical_name == k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect())
        }
    }

    struct MockFetcher(String);

    #[async_trait]
    impl SiteFetcher for MockFetcher {
        async fn fetch_text(&self, _url: &str) -> String {
            self.0.clone()
        }
    }

    fn subject() -> Subject {
        Subject {
            name: "Acme Logistics".into(),
            website: Some("https://acme.de".into()),
        }
    }

    fn long_text() -> String {
        "We are a logistics company. ".repeat(10)
    }

    fn options() -> Vec<IndustryOption> {
        vec![
            IndustryOption { id: 3, label: "Logistics".into() },
            IndustryOption { id: 9, label: "Technology".into() },
        ]
    }

    fn enricher(extractor: MockExtractor, site_text: &str) -> (Enricher, Arc<MockExtractor>) {
        let extractor = Arc::new(extractor);
        (
            Enricher::new(extractor.clone(), Arc::new(MockFetcher(site_text.to_string()))),
            extractor,
        )
    }

    #[tokio::test]
    async fn nothing_to_do_when_all_fields_filled() {
        let mut current = Map::new();
        for f in ORGANIZATION_FIELDS {
            current.insert(f.provider_key.to_string(), json!("filled"));
        }
        let (enricher, extractor) =
            enricher(MockExtractor::new(HashMap::new(), HashMap::new()), &long_text());

        let outcome = enricher.enrich(&subject(), &current, &options()).await.unwrap();
        assert!(outcome.nothing_to_do());
        assert!(outcome.payload.is_empty());
        // Guard fires before any fetch or LLM call.
        assert_eq!(extractor.pass1_calls.load(Ordering::SeqCst), 0);
        assert_eq!(extractor.pass2_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn industry_from_site_resolves_to_option_id() {
        let pass1 = HashMap::from([("industry".to_string(), json!("Logistics"))]);
        let (enricher, _) = enricher(MockExtractor::new(pass1, HashMap::new()), &long_text());

        let outcome = enricher.enrich(&subject(), &Map::new(), &options()).await.unwrap();

        let industry_key = crate::registry::field("industry").unwrap().provider_key;
        assert_eq!(outcome.payload.get(industry_key), Some(&json!(3)));
        assert!(outcome.filled_from_site.contains(&"industry".to_string()));
    }

    #[tokio::test]
    async fn short_site_text_fails_the_request() {
        let (enricher, extractor) =
            enricher(MockExtractor::new(HashMap::new(), HashMap::new()), "too short");

        let err = enricher.enrich(&subject(), &Map::new(), &options()).await.unwrap_err();
        assert!(matches!(err, EnrichmentError::SourceUnreadable(_)));
        assert_eq!(extractor.pass1_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_website_and_nothing_searchable_fails_before_any_llm_call() {
        let no_site = Subject { name: "Acme".into(), website: None };
        // Only non-searchable fields are empty.
        let mut current = Map::new();
        for f in ORGANIZATION_FIELDS.iter().filter(|f| f.web_searchable) {
            current.insert(f.provider_key.to_string(), json!("filled"));
        }
        let (enricher, extractor) =
            enricher(MockExtractor::new(HashMap::new(), HashMap::new()), &long_text());

        let err = enricher.enrich(&no_site, &current, &options()).await.unwrap_err();
        assert!(err.to_string().contains("no website"));
        assert_eq!(extractor.pass1_calls.load(Ordering::SeqCst), 0);
        assert_eq!(extractor.pass2_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn pass_one_wins_over_pass_two() {
        let pass1 = HashMap::from([("phone".to_string(), json!("+1 555 0100"))]);
        let pass2 = HashMap::from([("phone".to_string(), json!("+49 30 9999"))]);
        let (enricher, extractor) = enricher(MockExtractor::new(pass1, pass2), &long_text());

        let outcome = enricher.enrich(&subject(), &Map::new(), &options()).await.unwrap();

        let phone_key = crate::registry::field("phone").unwrap().provider_key;
        let stored = outcome.payload.get(phone_key).unwrap();
        assert_eq!(stored[0]["value"], json!("+1 555 0100"));
        // Phone was satisfied by pass 1, so pass 2 only ran for the
        // remaining searchable fields.
        assert_eq!(extractor.pass2_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pass_two_fills_residual_fields() {
        let pass2 = HashMap::from([("phone".to_string(), json!("+49 30 9999"))]);
        let (enricher, _) = enricher(MockExtractor::new(HashMap::new(), pass2), &long_text());

        let outcome = enricher.enrich(&subject(), &Map::new(), &options()).await.unwrap();
        assert!(outcome.filled_from_web.contains(&"phone".to_string()));
        assert!(outcome.not_found.contains(&"industry".to_string()));
    }

    #[tokio::test]
    async fn search_pass_failure_is_swallowed() {
        let mut extractor = MockExtractor::new(HashMap::new(), HashMap::new());
        extractor.pass2_fails = true;
        let (enricher, _) = enricher(extractor, &long_text());

        let outcome = enricher.enrich(&subject(), &Map::new(), &options()).await.unwrap();
        // Every target ends up not found, but the request succeeds.
        assert_eq!(outcome.not_found.len(), outcome.targets.len());
    }

    #[tokio::test]
    async fn unknown_enum_label_counts_as_not_found() {
        let pass1 = HashMap::from([("industry".to_string(), json!("Aerospace"))]);
        let (enricher, _) = enricher(MockExtractor::new(pass1, HashMap::new()), &long_text());

        let outcome = enricher.enrich(&subject(), &Map::new(), &options()).await.unwrap();
        assert!(outcome.not_found.contains(&"industry".to_string()));
    }

    #[test]
    fn domain_strips_www() {
        let s = Subject { name: "Acme".into(), website: Some("www.acme.de".into()) };
        assert_eq!(s.domain().as_deref(), Some("acme.de"));
    }
}
