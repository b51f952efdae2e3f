// handlers/protected/providers.rs - /v1/providers, backed by the provider database

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};

use crate::api::extract::{non_blank, parse_id};
use crate::api::{ApiResponse, BareResult};
use crate::database::models::{ChildProvider, FavoriteProvider, ProviderFilter};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProviderQuery {
    pub city: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggle {
    pub provider_id: i32,
    pub favorited: bool,
}

/// GET /v1/providers?city=&q=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProviderQuery>,
    headers: HeaderMap,
) -> BareResult<Vec<ChildProvider>> {
    state.identity.authenticate(&headers).await?;
    let filter = ProviderFilter {
        city: non_blank(query.city),
        search: non_blank(query.q),
    };
    let rows = state.repos.providers.list(filter).await?;
    Ok(ApiResponse::bare(rows))
}

/// GET /v1/providers/favorites
pub async fn favorites(State(state): State<AppState>, headers: HeaderMap) -> BareResult<Vec<FavoriteProvider>> {
    let auth = state.identity.authenticate(&headers).await?;
    let rows = state.repos.providers.favorites(auth.user_id).await?;
    Ok(ApiResponse::bare(rows))
}

/// POST /v1/providers/:providerId/favorite
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(provider_id): Path<String>,
    headers: HeaderMap,
) -> BareResult<FavoriteToggle> {
    let provider_id = parse_id("providerId", &provider_id)?;
    let auth = state.identity.authenticate(&headers).await?;

    if !state.repos.providers.exists(provider_id).await? {
        return Err(ApiError::not_found("Provider not found").into());
    }
    let favorited = state.repos.providers.toggle_favorite(auth.user_id, provider_id).await?;
    Ok(ApiResponse::bare(FavoriteToggle { provider_id, favorited }))
}
