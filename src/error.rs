use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Completion service error: {0}")]
    Upstream(String),

    #[error("Completion service timed out after {0} seconds")]
    Timeout(u64),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Pipeline stage reported to callers alongside the message.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Extraction(_) => "extraction",
            Error::Schema(_) => "schema",
            Error::Upstream(_) | Error::Timeout(_) | Error::Reqwest(_) => "completion",
            Error::BadRequest(_) | Error::Validation(_) | Error::Json(_) => "request",
            Error::Config(_) | Error::Anyhow(_) | Error::Internal(_) => "internal",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) | Error::Validation(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::Extraction(_) | Error::Schema(_) | Error::Upstream(_) | Error::Reqwest(_) => {
                StatusCode::BAD_GATEWAY
            }
            Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Error::Config(_) | Error::Anyhow(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let stage = self.stage();
        let error_message = match &self {
            Error::Reqwest(err) => format!("External service error: {}", err),
            Error::Config(_) | Error::Internal(_) => "An unexpected error occurred".to_string(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(stage, error = %self, "request failed");
        } else {
            tracing::warn!(stage, error = %self, "request rejected");
        }

        let body = Json(json!({ "error": error_message, "stage": stage }));
        (status, body).into_response()
    }
}
