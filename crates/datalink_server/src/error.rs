//! HTTP error mapping for API handlers.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use datalink_core::AppError;
use serde_json::json;

/// Error returned by handlers, rendered as `{"error": message}`.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    fn from_body_failure(status: StatusCode, body_text: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::new(status, "Upload exceeds the maximum request size");
        }
        if status.is_server_error() {
            tracing::error!("Failed to read request body: {}", body_text);
            return Self::internal();
        }
        Self::new(status, body_text)
    }
}

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound => Self::new(StatusCode::NOT_FOUND, "Not found"),
            AppError::NoValidInput => Self::new(
                StatusCode::BAD_REQUEST,
                "No valid input: upload an allowed file type or paste some text",
            ),
            AppError::BadRequest(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            other => {
                tracing::error!("Internal error: {}", other);
                Self::internal()
            }
        }
    }
}

impl From<MultipartError> for HttpError {
    fn from(err: MultipartError) -> Self {
        Self::from_body_failure(err.status(), err.body_text())
    }
}

impl From<MultipartRejection> for HttpError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::from_body_failure(rejection.status(), rejection.body_text())
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::from_body_failure(rejection.status(), rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for HttpError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!("Blocking task failed: {}", err);
        Self::internal()
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_errors_map_to_expected_statuses() {
        let cases = [
            (AppError::NotFound, StatusCode::NOT_FOUND),
            (AppError::NoValidInput, StatusCode::BAD_REQUEST),
            (
                AppError::BadRequest("bad name".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::StorageMessage("disk".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(HttpError::from(err).status(), expected);
        }
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = HttpError::from(AppError::StorageMessage("/secret/path".to_string()));
        assert_eq!(err.message(), "Internal server error");

        let err = HttpError::from(AppError::BadRequest("invalid file name 'x'".to_string()));
        assert_eq!(err.message(), "invalid file name 'x'");
    }
}
