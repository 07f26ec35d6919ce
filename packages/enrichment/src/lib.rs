//! Two-Pass CRM Field Enrichment Library
//!
//! Fills empty CRM record fields from two sources, in order of trust:
//!
//! 1. **Grounded pass** — the subject's own website, reduced to plain text
//!    and handed to the model verbatim.
//! 2. **Search pass** — open web search, only for fields the grounded pass
//!    left unresolved and that are declared web-searchable.
//!
//! The model is the executor of the extraction logic: the per-field
//! instruction block *is* the specification of correctness. The only
//! post-hoc gate is the value formatter, which rejects values that cannot
//! be mapped into the provider's representation (e.g. an enum label with
//! no matching option).
//!
//! # Modules
//!
//! - [`registry`] - Static field registry (logical name → provider key/type)
//! - [`emptiness`] - "Is this CRM field unset?" across heterogeneous shapes
//! - [`html`] - Best-effort HTML → plain text reduction and page fetching
//! - [`prompts`] - Per-field instruction blocks and prompt templates
//! - [`format`] - Extracted value → provider representation
//! - [`pipeline`] - The two-pass engine and its outcome report
//! - [`ai`] - OpenAI implementation of the extractor traits

pub mod ai;
pub mod emptiness;
pub mod error;
pub mod format;
pub mod html;
pub mod pipeline;
pub mod prompts;
pub mod registry;
pub mod traits;

pub use ai::OpenAI;
pub use error::{EnrichmentError, Result};
pub use html::{extract_text, HttpFetcher, MAX_TEXT_LEN};
pub use pipeline::{Enricher, EnrichmentOutcome, Subject, MIN_SITE_TEXT_LEN};
pub use registry::{FieldDescriptor, FieldKind, IndustryOption, ORGANIZATION_FIELDS};
pub use traits::{DealSummarizer, FieldExtractor, SiteFetcher};
