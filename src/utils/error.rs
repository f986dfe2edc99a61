use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// Any failed store operation. Surfaces as HTTP 500.
    DatabaseError(String),
    /// Body rejected by the JSON extractor. Surfaces as HTTP 400.
    InvalidRequest(String),
    /// Start-up configuration problem, never rendered over HTTP.
    ConfigError(String),
}

impl AppError {
    /// Raw message, without the kind prefix used by `Display`
    pub fn message(&self) -> &str {
        match self {
            AppError::DatabaseError(msg)
            | AppError::InvalidRequest(msg)
            | AppError::ConfigError(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("❌ {}", self);
        } else {
            log::warn!("⚠️ {}", self);
        }

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.message()
        }))
    }
}
