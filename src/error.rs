//! Typed errors and HTTP mapping.

use crate::service::FieldErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("Developer not found with id: {0}")]
    DeveloperNotFound(i64),
    #[error("Programming language not found with id: {0}")]
    LanguageNotFound(i64),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("request body exceeds the configured limit")]
    PayloadTooLarge,
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::DeveloperNotFound(_) | AppError::LanguageNotFound(_) => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

/// JSON body for every non-2xx response.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let (message, errors) = match self {
            AppError::Validation(fields) => {
                tracing::warn!(errors = ?fields, "validation error");
                ("Validation failed".to_string(), Some(fields.into_map()))
            }
            AppError::DeveloperNotFound(_) | AppError::LanguageNotFound(_) => {
                let message = self.to_string();
                tracing::warn!("{}", message);
                (message, None)
            }
            AppError::BadRequest(message) => {
                tracing::warn!(%message, "bad request");
                (message, None)
            }
            AppError::PayloadTooLarge => {
                let message = self.to_string();
                tracing::warn!("{}", message);
                (message, None)
            }
            other => {
                tracing::error!(error = %other, "an unexpected error occurred");
                ("An unexpected error occurred".to_string(), None)
            }
        };
        let body = ErrorBody {
            timestamp: Utc::now(),
            status: status.as_u16(),
            code: code.to_string(),
            message,
            errors,
        };
        (status, Json(body)).into_response()
    }
}
