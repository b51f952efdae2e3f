// handlers/protected/export.rs - /v1/export, /v1/export/history

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::api::extract::JsonBody;
use crate::api::{ApiResponse, ApiResult};
use crate::database::models::ExportRecord;
use crate::error::ApiError;
use crate::services::export::{ExportRequest, ExportSections};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBody {
    pub format: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub growth: bool,
    #[serde(default)]
    pub milestones: bool,
    #[serde(default)]
    pub feeding: bool,
    #[serde(default)]
    pub stool: bool,
}

impl ExportBody {
    fn validate(&self) -> Result<ExportRequest, ApiError> {
        ExportRequest::parse(
            self.format.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            ExportSections {
                growth: self.growth,
                milestones: self.milestones,
                feeding: self.feeding,
                stool: self.stool,
            },
        )
    }
}

/// POST /v1/export - responds with the file as an attachment
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<ExportBody>,
) -> Result<Response, ApiError> {
    let request = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;

    let file = state.exporter.assemble(auth.user_id, &request).await?;
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file.file_name))
        .map_err(|_| ApiError::internal_server_error("Failed to generate export"))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(file.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}

/// GET /v1/export/history - newest first
pub async fn history(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Vec<ExportRecord>> {
    let auth = state.identity.authenticate(&headers).await?;
    let records = state.repos.exports.list_exports(auth.user_id).await?;
    Ok(ApiResponse::ok(records))
}
