// handlers/protected/users.rs - /v1/users/me, /v1/doctors

use axum::{extract::State, http::HeaderMap};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::extract::{require, required_text, JsonBody};
use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{ProfileImage, User, UserUpdate};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProfileBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileImageBody {
    pub image_url: Option<String>,
}

/// GET /v1/users/me
pub async fn me_get(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<User> {
    let auth = state.identity.authenticate(&headers).await?;
    let user = state
        .repos
        .users
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::ok(user))
}

/// PUT /v1/users/me
pub async fn me_put(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<ProfileBody>,
) -> ApiResult<User> {
    require(&[("first_name", &body.first_name), ("last_name", &body.last_name)])?;
    let update = UserUpdate {
        first_name: required_text(body.first_name),
        last_name: required_text(body.last_name),
    };

    let auth = state.identity.authenticate(&headers).await?;
    let user = state
        .repos
        .users
        .update_user(auth.user_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::ok(user))
}

/// DELETE /v1/users/me - removes the account and everything it owns
pub async fn me_delete(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Value> {
    let auth = state.identity.authenticate(&headers).await?;
    if !state.repos.users.delete_user(auth.user_id).await? {
        return Err(ApiError::not_found("User not found"));
    }
    tracing::info!("Deleted user {}", auth.user_id);

    // Favorites live in the provider database, outside the delete transaction
    match state.repos.providers.clear_favorites(auth.user_id).await {
        Ok(removed) => tracing::debug!("Cleared {} provider favorites of user {}", removed, auth.user_id),
        Err(e) => tracing::error!("Failed to clear provider favorites of user {}: {}", auth.user_id, e),
    }
    Ok(ApiResponse::ok(json!({ "message": "User deleted successfully" })))
}

/// GET /v1/users/me/profile-image
pub async fn profile_image_get(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<ProfileImage> {
    let auth = state.identity.authenticate(&headers).await?;
    let image = state
        .repos
        .users
        .get_profile_image(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile image not found"))?;
    Ok(ApiResponse::ok(image))
}

/// PUT /v1/users/me/profile-image
pub async fn profile_image_put(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<ProfileImageBody>,
) -> ApiResult<ProfileImage> {
    require(&[("image_url", &body.image_url)])?;
    let image_url = required_text(body.image_url);

    let auth = state.identity.authenticate(&headers).await?;
    let image = state.repos.users.upsert_profile_image(auth.user_id, image_url).await?;
    Ok(ApiResponse::ok(image))
}

/// GET /v1/doctors
pub async fn doctors_list(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Vec<User>> {
    state.identity.authenticate(&headers).await?;
    let doctors = state.repos.users.list_doctors().await?;
    Ok(ApiResponse::ok(doctors))
}
