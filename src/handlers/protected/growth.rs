// handlers/protected/growth.rs - /v1/baby/:babyId/growth[/:growthId]

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::feeding::RangeQuery;
use crate::api::extract::{non_blank, parse_date, parse_id, require, JsonBody};
use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{Growth, GrowthInput};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GrowthBody {
    pub date: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

impl GrowthBody {
    fn validate(self) -> Result<GrowthInput, ApiError> {
        require(&[("date", &self.date), ("height", &self.height), ("weight", &self.weight)])?;

        let height = self.height.unwrap_or_default();
        let weight = self.weight.unwrap_or_default();
        if !(height.is_finite() && height > 0.0) {
            return Err(ApiError::bad_request("Invalid height"));
        }
        if !(weight.is_finite() && weight > 0.0) {
            return Err(ApiError::bad_request("Invalid weight"));
        }

        Ok(GrowthInput {
            date: parse_date("date", self.date.as_deref().unwrap_or_default())?,
            height,
            weight,
            notes: non_blank(self.notes),
        })
    }
}

/// GET /v1/baby/:babyId/growth
pub async fn list(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
) -> ApiResult<Vec<Growth>> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let range = query.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let rows = state.repos.growth.list(baby_id, range).await?;
    Ok(ApiResponse::ok(rows))
}

/// POST /v1/baby/:babyId/growth
pub async fn create(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<GrowthBody>,
) -> ApiResult<Growth> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let row = state.repos.growth.create(baby_id, input).await?;
    Ok(ApiResponse::ok(row).created())
}

/// PUT /v1/baby/:babyId/growth/:growthId
pub async fn update(
    State(state): State<AppState>,
    Path((baby_id, growth_id)): Path<(String, String)>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<GrowthBody>,
) -> ApiResult<Growth> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let growth_id = parse_id("growthId", &growth_id)?;
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let row = state
        .repos
        .growth
        .update(baby_id, growth_id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Growth record not found"))?;
    Ok(ApiResponse::ok(row))
}

/// DELETE /v1/baby/:babyId/growth/:growthId
pub async fn delete(
    State(state): State<AppState>,
    Path((baby_id, growth_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Value> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let growth_id = parse_id("growthId", &growth_id)?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    if !state.repos.growth.delete(baby_id, growth_id).await? {
        return Err(ApiError::not_found("Growth record not found"));
    }
    Ok(ApiResponse::ok(json!({ "message": "Growth record deleted successfully" })))
}
