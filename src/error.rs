// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::api::envelope::Envelope;
use crate::database::manager::DatabaseError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Render the error body in the shape used by the given endpoint group
    pub fn to_json(&self, envelope: Envelope) -> Value {
        match envelope {
            Envelope::Status | Envelope::Success => json!({
                "status": "error",
                "error": {
                    "code": self.status_code().as_u16(),
                    "message": self.message(),
                }
            }),
            Envelope::Bare => json!({
                "error": {
                    "message": self.message(),
                }
            }),
        }
    }

    pub fn into_response_with(self, envelope: Envelope) -> axum::response::Response {
        (self.status_code(), Json(self.to_json(envelope))).into_response()
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// 400 listing every missing body field, in declaration order
    pub fn missing_fields(fields: &[&str]) -> Self {
        ApiError::BadRequest(format!("Missing required fields: {}", fields.join(", ")))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict(msg) => ApiError::conflict(msg),
            DatabaseError::Sqlx(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tracing::warn!("Unique constraint violated: {}", db_err);
                ApiError::conflict("Record already exists")
            }
            DatabaseError::Sqlx(sqlx::Error::PoolTimedOut) => {
                tracing::error!("Database pool timed out");
                ApiError::internal_server_error("Internal server error")
            }
            other => {
                // Log the real error but return generic message
                tracing::error!("Database error: {}", other);
                ApiError::internal_server_error("Internal server error")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum (status/success endpoint groups)
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        self.into_response_with(Envelope::Status)
    }
}

/// Error rendered as `{"error":{"message":…}}` for endpoint groups that answer with bare payloads
#[derive(Debug)]
pub struct BareError(pub ApiError);

impl From<ApiError> for BareError {
    fn from(err: ApiError) -> Self {
        BareError(err)
    }
}

impl From<DatabaseError> for BareError {
    fn from(err: DatabaseError) -> Self {
        BareError(err.into())
    }
}

impl IntoResponse for BareError {
    fn into_response(self) -> axum::response::Response {
        self.0.into_response_with(Envelope::Bare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_envelope_carries_numeric_code() {
        let body = ApiError::not_found("Baby not found").to_json(Envelope::Status);
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"]["code"], 404);
        assert_eq!(body["error"]["message"], "Baby not found");
    }

    #[test]
    fn bare_envelope_only_has_message() {
        let body = ApiError::forbidden("nope").to_json(Envelope::Bare);
        assert_eq!(body, json!({"error": {"message": "nope"}}));
    }

    #[test]
    fn missing_fields_lists_names() {
        let err = ApiError::missing_fields(&["date", "time"]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Missing required fields: date, time");
    }

    #[test]
    fn database_errors_hide_details() {
        let err: ApiError = DatabaseError::Query("syntax error at or near".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal server error");
    }
}
