use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::{fmt, io};
use thiserror::Error;

/// Failures raised by the catalog services.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Missing required field or missing cover image; nothing was written.
    #[error("{0}")]
    Validation(String),
    /// Missing or incorrect admin token; nothing was written.
    #[error("unauthorized")]
    Unauthorized,
    #[error("project `{0}` already exists")]
    Conflict(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// A lightweight wrapper for general errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16()
        }));

        (self.status, body).into_response()
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => AppError::bad_request(msg),
            CatalogError::Unauthorized => AppError::unauthorized(),
            CatalogError::Conflict(id) => {
                AppError::new(StatusCode::CONFLICT, format!("project `{id}` already exists"))
            }
            other => {
                tracing::error!(error = %other, "catalog store failure");
                AppError::internal("Internal storage error")
            }
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        // Oversized bodies surface as 413; anything else is a malformed form.
        let status = err.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::new(status, err.body_text())
        } else {
            AppError::bad_request(err.body_text())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_errors_map_to_http_statuses() {
        let cases = [
            (CatalogError::validation("Champs requis manquants"), StatusCode::BAD_REQUEST),
            (CatalogError::Unauthorized, StatusCode::UNAUTHORIZED),
            (CatalogError::Conflict("42".into()), StatusCode::CONFLICT),
            (
                CatalogError::Io(io::Error::other("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status, expected);
        }
    }

    #[test]
    fn store_errors_do_not_leak_details() {
        let app = AppError::from(CatalogError::Io(io::Error::other("/secret/path")));
        assert!(!app.message.contains("/secret/path"));
    }
}
