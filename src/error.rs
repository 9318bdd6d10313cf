use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Auth(String),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("QR encoding error: {0}")]
    Qr(String),

    #[error("PNG encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // The underlying message is surfaced to the client as-is.
        let (status, body) = match &self {
            AppError::Validation(_) | AppError::Auth(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.to_string(), "success": false }),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string() }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
