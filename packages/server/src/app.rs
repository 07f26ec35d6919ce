//! Application setup and router construction.

use std::sync::Arc;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::routing::{get, post, put};
use axum::{Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use enrichment::{Enricher, HttpFetcher, OpenAI, SiteFetcher};
use pipedrive::Pipedrive;

use crate::config::Config;
use crate::exercises::PromptHistory;
use crate::routes::{exercises, health, oauth, populate};
use crate::store::Store;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Store,
    pub pipedrive: Arc<Pipedrive>,
    pub openai: Arc<OpenAI>,
    pub enricher: Arc<Enricher>,
    pub fetcher: Arc<dyn SiteFetcher>,
    pub history: Arc<PromptHistory>,
}

/// Build the Axum application router.
///
/// All external clients are constructed once here and shared across
/// requests; per-request data (tokens, org ids) flows through handlers.
pub fn build_app(config: Config, store: Store) -> Router {
    let openai = Arc::new(OpenAI::new(config.openai_api_key.clone()));
    let fetcher: Arc<dyn SiteFetcher> = Arc::new(HttpFetcher::new());
    let enricher = Arc::new(Enricher::new(openai.clone(), fetcher.clone()));
    let pipedrive = Arc::new(Pipedrive::new());

    let state = AppState {
        config: Arc::new(config),
        store,
        pipedrive,
        openai,
        enricher,
        fetcher,
        history: Arc::new(PromptHistory::new()),
    };

    // CORS: the populate endpoint is called from a CRM panel iframe.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/oauth/start", get(oauth::start_handler))
        .route("/oauth/callback", get(oauth::callback_handler))
        .route("/api/populate", post(populate::populate_handler))
        .route("/api/exercise", post(exercises::exercise_handler))
        .route("/api/check-answer", post(exercises::check_answer_handler))
        .route("/api/analyze-word", post(exercises::analyze_word_handler))
        .route(
            "/api/dictionary",
            get(exercises::list_words_handler).post(exercises::add_word_handler),
        )
        .route("/api/dictionary/sync", post(exercises::sync_words_handler))
        .route(
            "/api/dictionary/:id",
            put(exercises::update_word_handler).delete(exercises::delete_word_handler),
        )
        .route(
            "/api/log",
            get(exercises::list_log_handler)
                .post(exercises::add_log_handler)
                .delete(exercises::clear_log_handler),
        )
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
