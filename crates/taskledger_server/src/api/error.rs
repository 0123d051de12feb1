//! Wire mapping for service failures.
//!
//! # Invariants
//! - Validation messages reach the client verbatim.
//! - Store and internal failures reach the client only as a fixed
//!   per-operation message; details go to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use taskledger_core::TaskServiceError;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access. Please provide valid credentials.";
pub const NOT_FOUND_MESSAGE: &str = "Task not found";

#[derive(Debug)]
pub enum ApiError {
    /// 400 with `{"errors": [...]}`.
    Validation(Vec<String>),
    /// 404 with `{"error": "Task not found"}`.
    NotFound,
    /// 401 from the credential gate.
    Unauthorized,
    /// 500 with the operation's generic message.
    Internal(&'static str),
}

impl ApiError {
    pub fn from_service(err: TaskServiceError, failure: &'static str) -> Self {
        match err {
            TaskServiceError::Validation(errors) => Self::Validation(errors),
            TaskServiceError::NotFound(_) => Self::NotFound,
            TaskServiceError::Store(err) => Self::internal(failure, &err.to_string()),
        }
    }

    pub fn internal(failure: &'static str, detail: &str) -> Self {
        error!("event=request_failed module=api status=error failure=\"{failure}\" error={detail}");
        Self::Internal(failure)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(errors) => (StatusCode::BAD_REQUEST, json!({ "errors": errors })),
            Self::NotFound => (StatusCode::NOT_FOUND, json!({ "error": NOT_FOUND_MESSAGE })),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": UNAUTHORIZED_MESSAGE }),
            ),
            Self::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };
        (status, Json(body)).into_response()
    }
}
