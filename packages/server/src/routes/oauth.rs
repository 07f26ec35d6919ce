//! OAuth authorization-code flow against the CRM provider.
//!
//! `/oauth/start` issues a one-time CSRF state and redirects to the
//! provider's consent page; `/oauth/callback` validates the state before
//! looking at anything else, exchanges the code for a token pair, and
//! persists it keyed by the tenant id from a "who am I" call.

use axum::extract::Query;
use axum::response::Redirect;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

pub async fn start_handler(
    Extension(state): Extension<AppState>,
) -> ApiResult<Redirect> {
    let (client_id, _) = state
        .config
        .pipedrive_credentials()
        .map_err(|msg| ApiError::Config(msg.to_string()))?;

    let csrf_state = state.store.issue_state().await?;
    let url = state
        .pipedrive
        .authorize_url(client_id, &state.config.callback_url(), &csrf_state);

    Ok(Redirect::temporary(&url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

pub async fn callback_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<CallbackParams>,
) -> ApiResult<Json<Value>> {
    let (client_id, client_secret) = state
        .config
        .pipedrive_credentials()
        .map_err(|msg| ApiError::Config(msg.to_string()))?;

    // State is checked before the code: a CSRF failure must not leak
    // whether the code itself was valid.
    let csrf_state = params
        .state
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("missing state parameter".to_string()))?;
    if !state.store.consume_state(csrf_state).await? {
        return Err(ApiError::BadRequest(
            "invalid or expired state parameter".to_string(),
        ));
    }

    let code = params
        .code
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("authorization was declined".to_string()))?;

    let tokens = state
        .pipedrive
        .exchange_code(client_id, client_secret, code, &state.config.callback_url())
        .await?;

    let me = state.pipedrive.me(&tokens.access_token).await?;
    state
        .store
        .save_token(
            me.company_id,
            &tokens.access_token,
            &tokens.refresh_token,
            tokens.expires_in,
        )
        .await?;

    info!(company_id = me.company_id, "OAuth tokens stored");

    Ok(Json(json!({
        "ok": true,
        "company_id": me.company_id,
        "note": "Authorization complete. You can close this window.",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use enrichment::{Enricher, HttpFetcher, OpenAI, SiteFetcher};
    use pipedrive::Pipedrive;

    use crate::app::AppState;
    use crate::config::Config;
    use crate::exercises::PromptHistory;
    use crate::store::Store;

    // The OAuth base is unroutable: any attempt to exchange a code would
    // surface a transport error instead of a state rejection, so the
    // assertions below also prove the token endpoint was never reached.
    async fn app_state() -> AppState {
        let config = Config {
            database_url: "sqlite::memory:".into(),
            port: 8080,
            openai_api_key: "sk-test".into(),
            pipedrive_client_id: Some("client-id".into()),
            pipedrive_client_secret: Some("client-secret".into()),
            base_url: "http://localhost:8080".into(),
        };
        let openai = Arc::new(OpenAI::new("sk-test"));
        let fetcher: Arc<dyn SiteFetcher> = Arc::new(HttpFetcher::new());
        AppState {
            config: Arc::new(config),
            store: Store::in_memory().await.unwrap(),
            pipedrive: Arc::new(Pipedrive::new().with_oauth_base("http://127.0.0.1:1")),
            openai: openai.clone(),
            enricher: Arc::new(Enricher::new(openai, fetcher.clone())),
            fetcher,
            history: Arc::new(PromptHistory::new()),
        }
    }

    fn params(code: Option<&str>, state: Option<&str>) -> Query<CallbackParams> {
        Query(CallbackParams {
            code: code.map(String::from),
            state: state.map(String::from),
        })
    }

    #[tokio::test]
    async fn callback_rejects_unknown_state_before_touching_the_code() {
        let state = app_state().await;

        let err = callback_handler(Extension(state), params(Some("code"), Some("forged")))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("invalid or expired state"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn callback_rejects_missing_state() {
        let state = app_state().await;

        let err = callback_handler(Extension(state), params(Some("code"), None))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("missing state"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn declined_consent_is_rejected_and_still_consumes_the_state() {
        let state = app_state().await;
        let csrf = state.store.issue_state().await.unwrap();

        let err = callback_handler(Extension(state.clone()), params(None, Some(&csrf)))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("declined"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        // One-time use: the state cannot be replayed with a code attached.
        assert!(!state.store.consume_state(&csrf).await.unwrap());
    }

    #[tokio::test]
    async fn start_without_credentials_is_a_config_error() {
        let mut state = app_state().await;
        let mut config = (*state.config).clone();
        config.pipedrive_client_id = None;
        state.config = Arc::new(config);

        let err = start_handler(Extension(state)).await.unwrap_err();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
