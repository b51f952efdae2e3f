// handlers/protected/reminders.rs - /v1/baby/:babyId/reminders[/:reminderId], /v1/reminders/upcoming

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::extract::{
    non_blank, parse_bounded, parse_date, parse_id, parse_time, require, required_text, IdInput, JsonBody,
};
use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{Reminder, ReminderInput};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReminderBody {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
}

impl ReminderBody {
    fn validate(self) -> Result<ReminderInput, ApiError> {
        require(&[("title", &self.title), ("date", &self.date), ("time", &self.time)])?;
        Ok(ReminderInput {
            date: parse_date("date", self.date.as_deref().unwrap_or_default())?,
            time: parse_time("time", self.time.as_deref().unwrap_or_default())?,
            title: required_text(self.title),
            notes: non_blank(self.notes),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteBody {
    pub reminder_ids: Option<Vec<IdInput>>,
}

impl BulkDeleteBody {
    /// Validated ids, duplicates removed, first occurrence kept
    fn validate(self) -> Result<Vec<i32>, ApiError> {
        require(&[("reminderIds", &self.reminder_ids)])?;

        let mut ids = Vec::new();
        for raw in self.reminder_ids.unwrap_or_default() {
            let id = raw.parse("reminderId")?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResult {
    pub deleted_ids: Vec<i32>,
    pub deleted_count: usize,
    pub message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpcomingQuery {
    pub days: Option<String>,
}

/// GET /v1/baby/:babyId/reminders - soonest first
pub async fn list(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Vec<Reminder>> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let rows = state.repos.reminders.list(baby_id).await?;
    Ok(ApiResponse::ok(rows))
}

/// POST /v1/baby/:babyId/reminders
pub async fn create(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<ReminderBody>,
) -> ApiResult<Reminder> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let row = state.repos.reminders.create(baby_id, input).await?;
    Ok(ApiResponse::ok(row).created())
}

/// PUT /v1/baby/:babyId/reminders/:reminderId
pub async fn update(
    State(state): State<AppState>,
    Path((baby_id, reminder_id)): Path<(String, String)>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<ReminderBody>,
) -> ApiResult<Reminder> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let reminder_id = parse_id("reminderId", &reminder_id)?;
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let row = state
        .repos
        .reminders
        .update(baby_id, reminder_id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Reminder not found"))?;
    Ok(ApiResponse::ok(row))
}

/// DELETE /v1/baby/:babyId/reminders - body `{"reminderIds": [...]}`
pub async fn bulk_delete(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<BulkDeleteBody>,
) -> ApiResult<BulkDeleteResult> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let ids = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let deleted_ids = state.repos.reminders.delete_many(baby_id, ids).await?;
    let message = match deleted_ids.len() {
        0 => return Err(ApiError::not_found("No reminders found to delete")),
        1 => "Reminder deleted successfully",
        _ => "Reminders deleted successfully",
    };

    Ok(ApiResponse::ok(BulkDeleteResult {
        deleted_count: deleted_ids.len(),
        deleted_ids,
        message,
    }))
}

/// GET /v1/reminders/upcoming?days=N - every owned baby, today through today+N
pub async fn upcoming(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
    headers: HeaderMap,
) -> ApiResult<Vec<Reminder>> {
    let days = parse_bounded("days", query.days.as_deref(), 7, 1, 365)?;
    let auth = state.identity.authenticate(&headers).await?;

    let today = Utc::now().date_naive();
    let until = today + Duration::days(days);
    let rows = state.repos.reminders.upcoming(auth.user_id, today, until).await?;
    Ok(ApiResponse::ok(rows))
}
