use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use serde_json::json;
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Error parsing file: {0}")]
    Parse(String),
    #[error("Error analyzing dataset: {0}")]
    Processing(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Parse(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Processing(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message without the kind prefix `Display` adds.
    pub fn cause(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::NotFound(msg)
            | AppError::Parse(msg)
            | AppError::Processing(msg) => msg.clone(),
            AppError::Io(err) => err.to_string(),
        }
    }

    /// Reports any failure as a parse error, keeping the underlying cause.
    pub fn into_parse(self) -> AppError {
        match self {
            AppError::Parse(_) => self,
            other => AppError::Parse(other.cause()),
        }
    }

    /// Reports any failure as a processing error, keeping the underlying cause.
    pub fn into_processing(self) -> AppError {
        match self {
            AppError::Processing(_) => self,
            other => AppError::Processing(other.cause()),
        }
    }
}

impl From<polars::error::PolarsError> for AppError {
    fn from(err: polars::error::PolarsError) -> Self {
        AppError::Processing(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Processing(format!("worker task failed: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        let body = Json(json!({
            "detail": self.to_string()
        }));

        (status, body).into_response()
    }
}
