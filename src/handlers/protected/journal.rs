// handlers/protected/journal.rs - /v1/journal[/:entry_id]

use axum::{
    extract::{Path, State},
    http::HeaderMap,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::extract::{non_blank, parse_id, parse_optional_date, require, required_text, JsonBody};
use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{JournalEntry, JournalInput};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JournalBody {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

impl JournalBody {
    /// `fallback_date` fills in an absent `date`
    fn validate(self, fallback_date: NaiveDate) -> Result<JournalInput, ApiError> {
        require(&[("content", &self.content)])?;
        Ok(JournalInput {
            date: parse_optional_date("date", self.date.as_deref())?.unwrap_or(fallback_date),
            title: non_blank(self.title),
            content: required_text(self.content),
            category: non_blank(self.category),
        })
    }
}

/// GET /v1/journal - the caller's entries, newest first
pub async fn list(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Vec<JournalEntry>> {
    let auth = state.identity.authenticate(&headers).await?;
    let entries = state.repos.journal.list(auth.user_id).await?;
    Ok(ApiResponse::success(entries))
}

/// GET /v1/journal/:entry_id
pub async fn get(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<JournalEntry> {
    let entry_id = parse_id("entry_id", &entry_id)?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_journal_entry(entry_id, auth.user_id).await?;

    let entry = state
        .repos
        .journal
        .get(entry_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Journal entry not found"))?;
    Ok(ApiResponse::success(entry))
}

/// POST /v1/journal - `date` defaults to today
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<JournalBody>,
) -> ApiResult<JournalEntry> {
    let input = body.validate(Utc::now().date_naive())?;
    let auth = state.identity.authenticate(&headers).await?;

    let entry = state.repos.journal.create(auth.user_id, input).await?;
    Ok(ApiResponse::success(entry).created())
}

/// PUT /v1/journal/:entry_id - an absent `date` keeps the stored one
pub async fn update(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<JournalBody>,
) -> ApiResult<JournalEntry> {
    let entry_id = parse_id("entry_id", &entry_id)?;
    require(&[("content", &body.content)])?;
    parse_optional_date("date", body.date.as_deref())?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_journal_entry(entry_id, auth.user_id).await?;

    let existing = state
        .repos
        .journal
        .get(entry_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Journal entry not found"))?;
    let input = body.validate(existing.date)?;

    let entry = state
        .repos
        .journal
        .update(entry_id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Journal entry not found"))?;
    Ok(ApiResponse::success(entry))
}

/// DELETE /v1/journal/:entry_id
pub async fn delete(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Value> {
    let entry_id = parse_id("entry_id", &entry_id)?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_journal_entry(entry_id, auth.user_id).await?;

    if !state.repos.journal.delete(entry_id).await? {
        return Err(ApiError::not_found("Journal entry not found"));
    }
    Ok(ApiResponse::success(json!({ "message": "Journal entry deleted successfully" })))
}
