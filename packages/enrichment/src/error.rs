//! Typed errors for the enrichment library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so the server can
//! map each failure class onto the right HTTP status.

use thiserror::Error;

/// Errors that can occur during enrichment operations.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// AI service unavailable or returned an unusable response
    #[error("AI service error: {0}")]
    AI(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Source material missing or unreadable (no website, page text too
    /// short). Surfaced to the user as a quality failure, not a bug.
    #[error("{0}")]
    SourceUnreadable(String),

    /// Configuration error (missing API key, bad base URL)
    #[error("config error: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Result type alias for enrichment operations.
pub type Result<T> = std::result::Result<T, EnrichmentError>;
