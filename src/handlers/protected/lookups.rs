// handlers/protected/lookups.rs - /v1/coupons, /v1/quiz, /v1/tips
//
// These routes answer with the bare payload, and errors as `{"error":{"message"}}`.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
};
use chrono::Utc;
use serde::Deserialize;

use crate::api::extract::{non_blank, parse_bounded};
use crate::api::{ApiResponse, BareResult};
use crate::database::models::{Coupon, CuratedTip, QuizQuestion, TipFilter};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct QuizQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TipQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

/// GET /v1/coupons - unexpired coupons
pub async fn coupons(State(state): State<AppState>, headers: HeaderMap) -> BareResult<Vec<Coupon>> {
    state.identity.authenticate(&headers).await?;
    let today = Utc::now().date_naive();
    let rows = state.repos.lookups.active_coupons(today).await?;
    Ok(ApiResponse::bare(rows))
}

/// GET /v1/quiz?limit=N
pub async fn quiz(
    State(state): State<AppState>,
    Query(query): Query<QuizQuery>,
    headers: HeaderMap,
) -> BareResult<Vec<QuizQuestion>> {
    let limit = parse_bounded("limit", query.limit.as_deref(), 10, 1, 50)?;
    state.identity.authenticate(&headers).await?;
    let rows = state.repos.lookups.quiz_questions(limit).await?;
    Ok(ApiResponse::bare(rows))
}

/// GET /v1/tips?category=&q=
pub async fn tips(
    State(state): State<AppState>,
    Query(query): Query<TipQuery>,
    headers: HeaderMap,
) -> BareResult<Vec<CuratedTip>> {
    state.identity.authenticate(&headers).await?;
    let filter = TipFilter {
        category: non_blank(query.category),
        search: non_blank(query.q),
    };
    let rows = state.repos.lookups.tips(filter).await?;
    Ok(ApiResponse::bare(rows))
}
