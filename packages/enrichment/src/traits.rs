//! Trait seams between the pipeline and its external collaborators.
//!
//! Implementations wrap specific providers (OpenAI, plain HTTP) and handle
//! the specifics of prompting and response parsing; the pipeline only sees
//! these contracts, which keeps it testable with hand-written mocks.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::pipeline::Subject;
use crate::registry::{FieldDescriptor, IndustryOption};

/// LLM-backed field extraction.
///
/// Both methods return a map from logical field name to raw extracted
/// value. A field the model could not resolve is *absent* from the map —
/// explicit JSON null in the model response means the same thing, and
/// implementations drop those entries. Falsy-but-meaningful values
/// (numeric 0) must be kept.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    /// Pass 1: grounded extraction from the subject's own site text.
    async fn extract_from_text(
        &self,
        subject: &Subject,
        site_text: &str,
        fields: &[&'static FieldDescriptor],
        industry_options: &[IndustryOption],
    ) -> Result<HashMap<String, Value>>;

    /// Pass 2: open web search for fields the grounded pass missed.
    ///
    /// The implementation must require the model to verify a candidate
    /// result names both the subject and its domain, and to return null
    /// on any ambiguity.
    async fn extract_from_web(
        &self,
        subject: &Subject,
        fields: &[&'static FieldDescriptor],
        industry_options: &[IndustryOption],
    ) -> Result<HashMap<String, Value>>;
}

/// Short natural-language deal summaries (the write-back target for
/// `resource: "deal"`).
#[async_trait]
pub trait DealSummarizer: Send + Sync {
    async fn summarize_deal(
        &self,
        deal_title: &str,
        org_name: &str,
        site_text: &str,
        notes: &[String],
    ) -> Result<String>;
}

/// Fetch a page and reduce it to plain prompt text.
///
/// Failure semantics: any error yields empty text; callers treat
/// empty/short text as "could not read site".
#[async_trait]
pub trait SiteFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> String;
}
