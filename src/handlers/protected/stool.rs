// handlers/protected/stool.rs - /v1/baby/:babyId/stool[/:stoolId]

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::feeding::RangeQuery;
use crate::api::extract::{non_blank, parse_id, parse_timestamp, require, required_text, JsonBody};
use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{StoolEntry, StoolInput};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StoolBody {
    pub color: Option<String>,
    pub consistency: Option<String>,
    pub timestamp: Option<String>,
    pub notes: Option<String>,
}

impl StoolBody {
    fn validate(self) -> Result<StoolInput, ApiError> {
        require(&[
            ("color", &self.color),
            ("consistency", &self.consistency),
            ("timestamp", &self.timestamp),
        ])?;
        Ok(StoolInput {
            timestamp: parse_timestamp("timestamp", self.timestamp.as_deref().unwrap_or_default())?,
            color: required_text(self.color),
            consistency: required_text(self.consistency),
            notes: non_blank(self.notes),
        })
    }
}

/// GET /v1/baby/:babyId/stool - ordered by timestamp, newest first
pub async fn list(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
) -> ApiResult<Vec<StoolEntry>> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let range = query.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let rows = state.repos.stool.list(baby_id, range).await?;
    Ok(ApiResponse::ok(rows))
}

/// POST /v1/baby/:babyId/stool
pub async fn create(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<StoolBody>,
) -> ApiResult<StoolEntry> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let row = state.repos.stool.create(baby_id, input).await?;
    Ok(ApiResponse::ok(row).created())
}

/// PUT /v1/baby/:babyId/stool/:stoolId
pub async fn update(
    State(state): State<AppState>,
    Path((baby_id, stool_id)): Path<(String, String)>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<StoolBody>,
) -> ApiResult<StoolEntry> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let stool_id = parse_id("stoolId", &stool_id)?;
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let row = state
        .repos
        .stool
        .update(baby_id, stool_id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Stool entry not found"))?;
    Ok(ApiResponse::ok(row))
}

/// DELETE /v1/baby/:babyId/stool/:stoolId
pub async fn delete(
    State(state): State<AppState>,
    Path((baby_id, stool_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Value> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let stool_id = parse_id("stoolId", &stool_id)?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    if !state.repos.stool.delete(baby_id, stool_id).await? {
        return Err(ApiError::not_found("Stool entry not found"));
    }
    Ok(ApiResponse::ok(json!({ "message": "Stool entry deleted successfully" })))
}
