// handlers/protected/documents.rs - /v1/baby/:babyId/documents, /v1/doctor/documents

use axum::{
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::api::extract::{parse_id, require, required_text, IdInput, JsonBody};
use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{NewSharedDocument, SharedDocument};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ShareBody {
    pub doctor_id: Option<IdInput>,
    pub document_name: Option<String>,
    pub document_url: Option<String>,
}

impl ShareBody {
    fn validate(self) -> Result<NewSharedDocument, ApiError> {
        require(&[
            ("doctor_id", &self.doctor_id),
            ("document_name", &self.document_name),
            ("document_url", &self.document_url),
        ])?;

        let doctor_id = match &self.doctor_id {
            Some(raw) => raw.parse("doctor_id")?,
            None => return Err(ApiError::missing_fields(&["doctor_id"])),
        };

        Ok(NewSharedDocument {
            doctor_id,
            document_name: required_text(self.document_name),
            document_url: required_text(self.document_url),
        })
    }
}

/// GET /v1/baby/:babyId/documents
pub async fn list(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Vec<SharedDocument>> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let docs = state.repos.documents.list_for_baby(baby_id).await?;
    Ok(ApiResponse::ok(docs))
}

/// POST /v1/baby/:babyId/documents - share with a doctor
pub async fn share(
    State(state): State<AppState>,
    Path(baby_id): Path<String>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<ShareBody>,
) -> ApiResult<SharedDocument> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    let is_doctor = state
        .repos
        .users
        .get_user(input.doctor_id)
        .await?
        .is_some_and(|user| user.is_doctor());
    if !is_doctor {
        return Err(ApiError::not_found("Doctor not found"));
    }

    let doc = state.repos.documents.share(baby_id, auth.user_id, input).await?;
    Ok(ApiResponse::ok(doc).created())
}

/// DELETE /v1/baby/:babyId/documents/:documentId
pub async fn delete(
    State(state): State<AppState>,
    Path((baby_id, document_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Value> {
    let baby_id = parse_id("babyId", &baby_id)?;
    let document_id = parse_id("documentId", &document_id)?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_baby(baby_id, auth.user_id).await?;

    if !state.repos.documents.delete(baby_id, document_id).await? {
        return Err(ApiError::not_found("Document not found"));
    }
    Ok(ApiResponse::ok(json!({ "message": "Document deleted successfully" })))
}

/// GET /v1/doctor/documents - doctors only
pub async fn doctor_inbox(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Vec<SharedDocument>> {
    let auth = state.identity.authenticate(&headers).await?;

    let is_doctor = state
        .repos
        .users
        .get_user(auth.user_id)
        .await?
        .is_some_and(|user| user.is_doctor());
    if !is_doctor {
        warn!("User {} requested the doctor inbox without the doctor role", auth.user_id);
        return Err(ApiError::forbidden("Only doctors can view shared documents"));
    }

    let docs = state.repos.documents.list_for_doctor(auth.user_id).await?;
    Ok(ApiResponse::ok(docs))
}
