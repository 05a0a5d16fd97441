//! JSON error responses

use assigner_core::Error;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error returned by request handlers, rendered as
/// `{"error": {"code": ..., "message": ...}}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn missing_parameter(name: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "MISSING_PARAMETER",
            format!("{} parameter is required", name),
        )
    }

    pub fn missing_fields(fields: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "MISSING_FIELDS",
            format!("{} required", fields),
        )
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::TeamAlreadyExists(_) => (StatusCode::BAD_REQUEST, "TEAM_EXISTS"),
            Error::UserAlreadyExists(_) => (StatusCode::BAD_REQUEST, "USER_EXISTS"),
            Error::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            Error::TeamNotFound(_) => (StatusCode::NOT_FOUND, "TEAM_NOT_FOUND"),
            Error::UserNotFound(_) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            Error::PrNotFound(_) => (StatusCode::NOT_FOUND, "PR_NOT_FOUND"),
            Error::PrAlreadyExists(_) => (StatusCode::CONFLICT, "PR_EXISTS"),
            Error::NotEnoughReviewers(_) => (StatusCode::CONFLICT, "NOT_ENOUGH_REVIEWERS"),
            Error::PrAlreadyMerged(_) => (StatusCode::CONFLICT, "PR_MERGED"),
            Error::ReviewerNotAssigned { .. } => (StatusCode::CONFLICT, "NOT_ASSIGNED"),
            Error::NoReplacementCandidate { .. } => (StatusCode::CONFLICT, "NO_CANDIDATE"),
            Error::StaleAssignment { .. } => (StatusCode::CONFLICT, "STALE_ASSIGNMENT"),
            Error::Store(_) | Error::Config(_) => {
                tracing::error!(error = %err, "Request failed");
                return Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal server error",
                );
            }
        };

        Self::new(status, code, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        Self::new(StatusCode::BAD_REQUEST, "INVALID_JSON", "invalid JSON format")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        });
        (self.status, Json(body)).into_response()
    }
}
