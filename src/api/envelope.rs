use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{ApiError, BareError};

/// Response shape of an endpoint group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `{"status":"ok","data":…}`
    Status,
    /// `{"status":"success","data":…}`
    Success,
    /// The payload itself
    Bare,
}

impl Envelope {
    pub fn wrap(self, data: Value) -> Value {
        match self {
            Envelope::Status => json!({ "status": "ok", "data": data }),
            Envelope::Success => json!({ "status": "success", "data": data }),
            Envelope::Bare => data,
        }
    }
}

/// Successful handler output, serialized into its group's envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: StatusCode,
    pub envelope: Envelope,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 in the `status: ok` envelope
    pub fn ok(data: T) -> Self {
        Self::with_status(data, StatusCode::OK, Envelope::Status)
    }

    /// 200 in the `status: success` envelope
    pub fn success(data: T) -> Self {
        Self::with_status(data, StatusCode::OK, Envelope::Success)
    }

    /// 200 with no envelope
    pub fn bare(data: T) -> Self {
        Self::with_status(data, StatusCode::OK, Envelope::Bare)
    }

    pub fn with_status(data: T, status_code: StatusCode, envelope: Envelope) -> Self {
        Self {
            data,
            status_code,
            envelope,
        }
    }

    /// Same envelope, 201 Created
    pub fn created(mut self) -> Self {
        self.status_code = StatusCode::CREATED;
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(&self.data) {
            Ok(value) => (self.status_code, Json(self.envelope.wrap(value))).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                ApiError::internal_server_error("Internal server error").into_response_with(self.envelope)
            }
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
pub type BareResult<T> = Result<ApiResponse<T>, BareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_per_group() {
        let data = json!({"id": 1});
        assert_eq!(Envelope::Status.wrap(data.clone()), json!({"status": "ok", "data": {"id": 1}}));
        assert_eq!(Envelope::Success.wrap(data.clone()), json!({"status": "success", "data": {"id": 1}}));
        assert_eq!(Envelope::Bare.wrap(data.clone()), data);
    }

    #[test]
    fn created_keeps_envelope() {
        let response = ApiResponse::success(1).created();
        assert_eq!(response.status_code, StatusCode::CREATED);
        assert_eq!(response.envelope, Envelope::Success);
    }
}
