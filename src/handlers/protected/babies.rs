// handlers/protected/babies.rs - /v1/baby[/:babyId]

use axum::{
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::extract::{parse_date, parse_id, require, required_text, JsonBody};
use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{Baby, BabyInput};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BabyBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
}

impl BabyBody {
    fn validate(self) -> Result<BabyInput, ApiError> {
        require(&[
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("gender", &self.gender),
            ("birthdate", &self.birthdate),
        ])?;

        Ok(BabyInput {
            birthdate: parse_date("birthdate", self.birthdate.as_deref().unwrap_or_default())?,
            first_name: required_text(self.first_name),
            last_name: required_text(self.last_name),
            gender: required_text(self.gender),
            weight: self.weight,
            height: self.height,
        })
    }
}

/// GET /v1/baby - babies linked to the caller
pub async fn list(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Vec<Baby>> {
    let auth = state.identity.authenticate(&headers).await?;
    let babies = state.repos.babies.list_for_user(auth.user_id).await?;
    Ok(ApiResponse::ok(babies))
}

/// POST /v1/baby
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<BabyBody>,
) -> ApiResult<Baby> {
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    let baby = state.repos.babies.create_for_user(auth.user_id, input).await?;
    Ok(ApiResponse::ok(baby).created())
}

/// GET /v1/baby/:babyId
pub async fn get(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Baby> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let baby = state
        .repos
        .babies
        .get(baby_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Baby not found"))?;
    Ok(ApiResponse::ok(baby))
}

/// PUT /v1/baby/:babyId
pub async fn update(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<BabyBody>,
) -> ApiResult<Baby> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let baby = state
        .repos
        .babies
        .update(baby_id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Baby not found"))?;
    Ok(ApiResponse::ok(baby))
}

/// DELETE /v1/baby/:babyId - the baby and all of its care logs and links
pub async fn delete(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Value> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    if !state.repos.babies.delete(baby_id).await? {
        return Err(ApiError::not_found("Baby not found"));
    }
    Ok(ApiResponse::ok(json!({ "message": "Baby deleted successfully" })))
}
