// handlers/protected/milestones.rs - /v1/baby/:babyId/milestones[/:milestoneId]

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::feeding::RangeQuery;
use crate::api::extract::{non_blank, parse_date, parse_id, require, required_text, JsonBody};
use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{Milestone, MilestoneInput};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MilestoneBody {
    pub date: Option<String>,
    pub title: Option<String>,
    pub details: Option<String>,
}

impl MilestoneBody {
    fn validate(self) -> Result<MilestoneInput, ApiError> {
        require(&[("date", &self.date), ("title", &self.title)])?;
        Ok(MilestoneInput {
            date: parse_date("date", self.date.as_deref().unwrap_or_default())?,
            title: required_text(self.title),
            details: non_blank(self.details),
        })
    }
}

/// GET /v1/baby/:babyId/milestones
pub async fn list(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
) -> ApiResult<Vec<Milestone>> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let range = query.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let rows = state.repos.milestones.list(baby_id, range).await?;
    Ok(ApiResponse::ok(rows))
}

/// POST /v1/baby/:babyId/milestones
pub async fn create(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<MilestoneBody>,
) -> ApiResult<Milestone> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let row = state.repos.milestones.create(baby_id, input).await?;
    Ok(ApiResponse::ok(row).created())
}

/// PUT /v1/baby/:babyId/milestones/:milestoneId
pub async fn update(
    State(state): State<AppState>,
    Path((baby_id, milestone_id)): Path<(String, String)>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<MilestoneBody>,
) -> ApiResult<Milestone> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let milestone_id = parse_id("milestoneId", &milestone_id)?;
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let row = state
        .repos
        .milestones
        .update(baby_id, milestone_id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Milestone not found"))?;
    Ok(ApiResponse::ok(row))
}

/// DELETE /v1/baby/:babyId/milestones/:milestoneId
pub async fn delete(
    State(state): State<AppState>,
    Path((baby_id, milestone_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Value> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let milestone_id = parse_id("milestoneId", &milestone_id)?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    if !state.repos.milestones.delete(baby_id, milestone_id).await? {
        return Err(ApiError::not_found("Milestone not found"));
    }
    Ok(ApiResponse::ok(json!({ "message": "Milestone deleted successfully" })))
}
