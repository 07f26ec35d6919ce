//! German exercise endpoints: generation, grading, word analysis, and
//! the dictionary / learning-log CRUD.

use axum::extract::Path;
use axum::{Extension, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::exercises::{parse_word_analysis, prompts, ExerciseKind, TopicSelection};
use crate::store::DictionaryWord;

#[derive(Debug, Deserialize)]
pub struct ExerciseRequest {
    #[serde(default)]
    pub topics: Vec<TopicSelection>,
    #[serde(default = "default_exercise_type")]
    pub exercise_type: String,
    #[serde(default)]
    pub dictionary_words: Vec<DictionaryWord>,
}

fn default_exercise_type() -> String {
    "translation".to_string()
}

pub async fn exercise_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<ExerciseRequest>,
) -> ApiResult<Json<Value>> {
    if request.topics.is_empty() && request.dictionary_words.is_empty() {
        return Err(ApiError::BadRequest(
            "no topics or dictionary words provided".to_string(),
        ));
    }

    let kind = ExerciseKind::parse(&request.exercise_type);
    debug!(
        kind = kind.as_str(),
        topics = request.topics.len(),
        dictionary_words = request.dictionary_words.len(),
        "generating exercise"
    );

    let prompt = prompts::build_exercise_prompt(
        kind,
        &request.topics,
        &request.dictionary_words,
        &state.history,
    );
    let question = state
        .openai
        .complete(prompts::GENERATION_SYSTEM, &prompt)
        .await
        .map_err(ApiError::from)?;
    let question = question.trim().to_string();

    state.history.push(&question);

    Ok(Json(json!({
        "question": question,
        "exercise_type": kind.as_str(),
        "using_dictionary": !request.dictionary_words.is_empty(),
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

#[derive(Debug, Deserialize)]
pub struct CheckAnswerRequest {
    pub question: String,
    pub answer: String,
    #[serde(default = "default_exercise_type")]
    pub exercise_type: String,
}

pub async fn check_answer_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<CheckAnswerRequest>,
) -> ApiResult<Json<Value>> {
    if request.question.trim().is_empty() || request.answer.trim().is_empty() {
        return Err(ApiError::BadRequest("question and answer required".to_string()));
    }

    let kind = ExerciseKind::parse(&request.exercise_type);
    let prompt = prompts::build_feedback_prompt(kind, &request.question, &request.answer);
    let feedback = state
        .openai
        .complete(prompts::GRADING_SYSTEM, &prompt)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(json!({
        "feedback": feedback.trim(),
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeWordRequest {
    pub word: String,
    #[serde(default)]
    pub context: String,
}

pub async fn analyze_word_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<AnalyzeWordRequest>,
) -> ApiResult<Json<Value>> {
    if request.word.trim().is_empty() {
        return Err(ApiError::BadRequest("word required".to_string()));
    }

    let prompt = prompts::build_word_analysis_prompt(&request.word, &request.context);
    let response = state
        .openai
        .complete(prompts::ANALYSIS_SYSTEM, &prompt)
        .await
        .map_err(ApiError::from)?;

    let analysis = parse_word_analysis(&response).ok_or_else(|| {
        ApiError::BadRequest(format!("could not analyze \"{}\"", request.word))
    })?;

    Ok(Json(serde_json::to_value(analysis).unwrap_or_default()))
}

// =============================================================================
// Dictionary
// =============================================================================

pub async fn list_words_handler(
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<Value>> {
    let words = state.store.list_words().await?;
    Ok(Json(json!({ "words": words })))
}

pub async fn add_word_handler(
    Extension(state): Extension<AppState>,
    Json(word): Json<DictionaryWord>,
) -> ApiResult<Json<Value>> {
    if word.german.trim().is_empty() {
        return Err(ApiError::BadRequest("german word required".to_string()));
    }
    let id = state.store.add_word(&word).await?;
    Ok(Json(json!({ "ok": true, "id": id })))
}

pub async fn update_word_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<i64>,
    Json(word): Json<DictionaryWord>,
) -> ApiResult<Json<Value>> {
    if word.german.trim().is_empty() {
        return Err(ApiError::BadRequest("german word required".to_string()));
    }
    if !state.store.update_word(id, &word).await? {
        return Err(ApiError::BadRequest(format!("no word with id {}", id)));
    }
    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    #[serde(default)]
    pub words: Vec<DictionaryWord>,
}

/// Merge a client-side dictionary into the stored one; words whose
/// German form is already known are kept as stored.
pub async fn sync_words_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<SyncRequest>,
) -> ApiResult<Json<Value>> {
    let added = state.store.sync_words(&request.words).await?;
    let words = state.store.list_words().await?;
    let total = words.len();
    Ok(Json(json!({
        "words": words,
        "added_count": added,
        "total_count": total,
    })))
}

pub async fn delete_word_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    if !state.store.delete_word(id).await? {
        return Err(ApiError::BadRequest(format!("no word with id {}", id)));
    }
    Ok(Json(json!({ "ok": true })))
}

// =============================================================================
// Learning log
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    pub content: String,
}

pub async fn list_log_handler(
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<Value>> {
    let entries = state.store.list_log(100).await?;
    Ok(Json(json!({ "entries": entries })))
}

pub async fn add_log_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<LogRequest>,
) -> ApiResult<Json<Value>> {
    if request.content.trim().is_empty() {
        return Err(ApiError::BadRequest("content required".to_string()));
    }
    let id = state.store.add_log_entry(&request.content).await?;
    Ok(Json(json!({ "ok": true, "id": id })))
}

pub async fn clear_log_handler(
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<Value>> {
    let deleted = state.store.clear_log().await?;
    Ok(Json(json!({ "ok": true, "deleted": deleted })))
}
