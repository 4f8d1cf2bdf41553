use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Application error taxonomy.
///
/// Validation failures surface as 400, a missing invoice as 404, everything
/// else (renderer, database, templates) as 500. Nothing is retried.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid value for '{field}': {message}")]
    Validation { field: &'static str, message: String },

    #[error("invoice {0} not found")]
    NotFound(i32),

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Render(_)
            | AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Template(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = AppError::Validation {
            field: "quantity",
            message: "'three' is not an integer".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("quantity"));
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = AppError::NotFound(42);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn render_maps_to_500() {
        let err = AppError::Render("font table truncated".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
