// handlers/protected/feeding.rs - /v1/baby/:babyId/feeding-schedules[/:feedingScheduleId]

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::extract::{
    non_blank, parse_date, parse_id, parse_optional_date, parse_time, require, required_text, JsonBody,
    TextOrNumber,
};
use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{DateRange, FeedingInput, FeedingSchedule};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedingBody {
    pub date: Option<String>,
    pub time: Option<String>,
    pub meal: Option<String>,
    pub amount: Option<TextOrNumber>,
    #[serde(rename = "type")]
    pub feeding_type: Option<String>,
    pub issues: Option<String>,
    pub notes: Option<String>,
}

impl FeedingBody {
    fn validate(self) -> Result<FeedingInput, ApiError> {
        require(&[
            ("date", &self.date),
            ("time", &self.time),
            ("meal", &self.meal),
            ("type", &self.feeding_type),
        ])?;

        Ok(FeedingInput {
            date: parse_date("date", self.date.as_deref().unwrap_or_default())?,
            time: parse_time("time", self.time.as_deref().unwrap_or_default())?,
            meal: required_text(self.meal),
            amount: non_blank(self.amount.map(TextOrNumber::into_text)),
            feeding_type: required_text(self.feeding_type),
            issues: non_blank(self.issues),
            notes: non_blank(self.notes),
        })
    }
}

/// Optional `startDate` / `endDate` filter shared by the care-log listings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RangeQuery {
    pub fn validate(&self) -> Result<DateRange, ApiError> {
        let range = DateRange::new(
            parse_optional_date("startDate", self.start_date.as_deref())?,
            parse_optional_date("endDate", self.end_date.as_deref())?,
        );
        if let (Some(s), Some(e)) = (range.start, range.end) {
            if s > e {
                return Err(ApiError::bad_request("startDate must be on or before endDate"));
            }
        }
        Ok(range)
    }
}

/// GET /v1/baby/:babyId/feeding-schedules - newest first
pub async fn list(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
) -> ApiResult<Vec<FeedingSchedule>> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let range = query.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let rows = state.repos.feeding.list(baby_id, range).await?;
    Ok(ApiResponse::ok(rows))
}

/// POST /v1/baby/:babyId/feeding-schedules
pub async fn create(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<FeedingBody>,
) -> ApiResult<FeedingSchedule> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let row = state.repos.feeding.create(baby_id, input).await?;
    Ok(ApiResponse::ok(row).created())
}

/// PUT /v1/baby/:babyId/feeding-schedules/:feedingScheduleId
pub async fn update(
    State(state): State<AppState>,
    Path((baby_id, feeding_id)): Path<(String, String)>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<FeedingBody>,
) -> ApiResult<FeedingSchedule> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let feeding_id = parse_id("feedingScheduleId", &feeding_id)?;
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let row = state
        .repos
        .feeding
        .update(baby_id, feeding_id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Feeding schedule not found"))?;
    Ok(ApiResponse::ok(row))
}

/// DELETE /v1/baby/:babyId/feeding-schedules/:feedingScheduleId
pub async fn delete(
    State(state): State<AppState>,
    Path((baby_id, feeding_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Value> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let feeding_id = parse_id("feedingScheduleId", &feeding_id)?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    if !state.repos.feeding.delete(baby_id, feeding_id).await? {
        return Err(ApiError::not_found("Feeding schedule not found"));
    }
    Ok(ApiResponse::ok(json!({ "message": "Feeding schedule deleted successfully" })))
}
