//! The populate endpoint: fill empty fields on a CRM record.
//!
//! Organizations go through the two-pass enrichment engine; deals get an
//! LLM-written summary built from the linked organization's website text
//! and the deal's notes, optionally restricted to a date window.

use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use enrichment::emptiness::is_empty;
use enrichment::registry::DEAL_SUMMARY_KEY;
use enrichment::{DealSummarizer, IndustryOption, Subject};
use pipedrive::Note;

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::store::StoredToken;

#[derive(Debug, Deserialize)]
pub struct PopulateRequest {
    /// "organization" or "deal"
    pub resource: String,
    pub id: i64,
    #[serde(rename = "companyId")]
    pub company_id: i64,
    /// Inclusive "YYYY-MM-DD" bounds on which deal notes feed the summary.
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PopulateResponse {
    pub ok: bool,
    pub message: String,
    pub filled_website: Vec<String>,
    pub filled_web: Vec<String>,
    pub not_found: Vec<String>,
}

impl PopulateResponse {
    fn nothing_to_do(what: &str) -> Self {
        Self {
            ok: true,
            message: format!("{} Nothing to do.", what),
            filled_website: Vec::new(),
            filled_web: Vec::new(),
            not_found: Vec::new(),
        }
    }
}

pub async fn populate_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<PopulateRequest>,
) -> ApiResult<Json<PopulateResponse>> {
    let token = valid_token(&state, request.company_id).await?;

    let response = match request.resource.as_str() {
        "organization" => populate_organization(&state, &token, request.id).await?,
        "deal" => {
            populate_deal(
                &state,
                &token,
                request.id,
                request.date_from.as_deref(),
                request.date_to.as_deref(),
            )
            .await?
        }
        other => {
            return Err(ApiError::BadRequest(format!(
                "unknown resource type: {}",
                other
            )))
        }
    };

    Ok(Json(response))
}

/// Load the tenant's token, refreshing it through the provider when the
/// stored pair has expired.
async fn valid_token(state: &AppState, company_id: i64) -> ApiResult<StoredToken> {
    let token = state
        .store
        .load_token(company_id)
        .await?
        .ok_or_else(|| {
            ApiError::Auth(format!(
                "no stored authorization for company {}; complete OAuth first",
                company_id
            ))
        })?;

    if !token.is_expired() {
        return Ok(token);
    }

    let (client_id, client_secret) = state
        .config
        .pipedrive_credentials()
        .map_err(|msg| ApiError::Config(msg.to_string()))?;

    info!(company_id, "access token expired, refreshing");
    let fresh = state
        .pipedrive
        .refresh_token(client_id, client_secret, &token.refresh_token)
        .await?;

    state
        .store
        .save_token(
            company_id,
            &fresh.access_token,
            &fresh.refresh_token,
            fresh.expires_in,
        )
        .await?;

    state.store.load_token(company_id).await?.ok_or_else(|| {
        ApiError::Auth(format!("token for company {} vanished after refresh", company_id))
    })
}

async fn populate_organization(
    state: &AppState,
    token: &StoredToken,
    org_id: i64,
) -> ApiResult<PopulateResponse> {
    let org = state
        .pipedrive
        .get_organization(&token.access_token, org_id)
        .await?;

    let subject = Subject {
        name: org.name.clone(),
        website: org.website(),
    };

    // The option set is only needed when the enum field is a target.
    let industry_key = enrichment::registry::field("industry")
        .map(|f| f.provider_key)
        .unwrap_or_default();
    let industry_options: Vec<IndustryOption> = if is_empty(
        org.fields.get(industry_key).unwrap_or(&Value::Null),
    ) {
        state
            .pipedrive
            .organization_field_options(&token.access_token, industry_key)
            .await?
            .into_iter()
            .map(|o| IndustryOption { id: o.id, label: o.label })
            .collect()
    } else {
        Vec::new()
    };

    let outcome = state
        .enricher
        .enrich(&subject, &org.fields, &industry_options)
        .await?;

    if outcome.nothing_to_do() {
        return Ok(PopulateResponse::nothing_to_do("All fields are already filled."));
    }

    if !outcome.payload.is_empty() {
        state
            .pipedrive
            .update_organization(&token.access_token, org_id, &outcome.payload)
            .await?;
    }

    let message = format!(
        "Filled {} of {} empty fields on {}.",
        outcome.filled_from_site.len() + outcome.filled_from_web.len(),
        outcome.targets.len(),
        org.name,
    );

    Ok(PopulateResponse {
        ok: true,
        message,
        filled_website: outcome.filled_from_site,
        filled_web: outcome.filled_from_web,
        not_found: outcome.not_found,
    })
}

async fn populate_deal(
    state: &AppState,
    token: &StoredToken,
    deal_id: i64,
    date_from: Option<&str>,
    date_to: Option<&str>,
) -> ApiResult<PopulateResponse> {
    let deal = state.pipedrive.get_deal(&token.access_token, deal_id).await?;

    if !is_empty(deal.fields.get(DEAL_SUMMARY_KEY).unwrap_or(&Value::Null)) {
        return Ok(PopulateResponse::nothing_to_do(
            "The summary field is already filled.",
        ));
    }

    let org_id = deal.org_id().ok_or_else(|| {
        ApiError::BadRequest("deal has no linked organization".to_string())
    })?;
    let org = state
        .pipedrive
        .get_organization(&token.access_token, org_id)
        .await?;

    // Site text is best-effort for summaries; notes alone can carry it.
    let site_text = match org.website() {
        Some(website) => state.fetcher.fetch_text(&website).await,
        None => String::new(),
    };

    let notes = state
        .pipedrive
        .list_deal_notes(&token.access_token, deal_id)
        .await?;
    let note_texts: Vec<String> = notes
        .iter()
        .filter(|n| note_in_window(n, date_from, date_to))
        .map(|n| enrichment::extract_text(&n.content))
        .filter(|t| !t.is_empty())
        .collect();

    if site_text.is_empty() && note_texts.is_empty() {
        return Err(ApiError::BadRequest(
            "no source material: the organization has no readable website and the deal has no notes in the selected period".to_string(),
        ));
    }

    let summary = state
        .openai
        .summarize_deal(&deal.title, &org.name, &site_text, &note_texts)
        .await
        .map_err(ApiError::from)?;

    let mut payload = Map::new();
    payload.insert(DEAL_SUMMARY_KEY.to_string(), Value::String(summary));
    state
        .pipedrive
        .update_deal(&token.access_token, deal_id, &payload)
        .await?;

    Ok(PopulateResponse {
        ok: true,
        message: format!("Summary written to deal \"{}\".", deal.title),
        filled_website: vec!["summary".to_string()],
        filled_web: Vec::new(),
        not_found: Vec::new(),
    })
}

/// Inclusive date-window filter over the note's "YYYY-MM-DD HH:MM:SS"
/// timestamp. Lexicographic comparison on the date prefix is enough.
fn note_in_window(note: &Note, date_from: Option<&str>, date_to: Option<&str>) -> bool {
    let date = match note.add_time.get(..10) {
        Some(d) => d,
        None => return date_from.is_none() && date_to.is_none(),
    };
    if let Some(from) = date_from {
        if date < from {
            return false;
        }
    }
    if let Some(to) = date_to {
        if date > to {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(add_time: &str) -> Note {
        Note {
            id: 1,
            content: "text".into(),
            add_time: add_time.into(),
        }
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let n = note("2024-03-15 10:00:00");
        assert!(note_in_window(&n, Some("2024-03-15"), Some("2024-03-15")));
        assert!(note_in_window(&n, Some("2024-03-01"), Some("2024-03-31")));
        assert!(!note_in_window(&n, Some("2024-03-16"), None));
        assert!(!note_in_window(&n, None, Some("2024-03-14")));
    }

    #[test]
    fn open_window_accepts_everything() {
        assert!(note_in_window(&note("2020-01-01 00:00:00"), None, None));
    }

    #[test]
    fn malformed_timestamp_only_passes_open_windows() {
        let n = note("bad");
        assert!(note_in_window(&n, None, None));
        assert!(!note_in_window(&n, Some("2024-01-01"), None));
    }

    #[test]
    fn request_deserializes_panel_payload() {
        let request: PopulateRequest = serde_json::from_str(
            r#"{"resource": "deal", "id": 7, "companyId": 42, "date_from": "2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(request.resource, "deal");
        assert_eq!(request.company_id, 42);
        assert_eq!(request.date_from.as_deref(), Some("2024-01-01"));
        assert!(request.date_to.is_none());
    }
}
