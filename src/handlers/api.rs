use crate::db::FeedbackRecord;
use crate::error::AppError;
use crate::middleware::auth::RequireAdmin;
use crate::router::AppState;
use crate::service::qr;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct FeedbackPayload {
    #[serde(default)]
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// POST /api/feedback (public)
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(payload): Json<FeedbackPayload>,
) -> Result<impl IntoResponse, AppError> {
    state
        .service
        .submit(
            payload.rating,
            &payload.comment,
            &payload.name,
            &payload.email,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Feedback submitted successfully", "success": true })),
    ))
}

/// GET /api/feedback (admin only) -> all records, most recent first.
pub async fn list_feedback(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<FeedbackRecord>>, AppError> {
    Ok(Json(state.service.list().await?))
}

/// GET /api/stats (admin only)
pub async fn feedback_stats(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.service.compute_stats().await?))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordPayload {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// POST /api/change-password (admin only)
pub async fn change_password(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    state
        .service
        .change_admin_password(
            &payload.current_password,
            &payload.new_password,
            &payload.confirm_password,
        )
        .await?;
    Ok(Json(
        json!({ "message": "Password changed successfully", "success": true }),
    ))
}

/// GET /qr (public) -> PNG linking to the feedback form on this host.
pub async fn qr_code(headers: HeaderMap) -> Result<Response, AppError> {
    let png = qr::feedback_qr_png(&request_base_url(&headers))?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

/// scheme+host of the inbound request, honoring `x-forwarded-proto` when
/// running behind a proxy.
fn request_base_url(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost:5000");
    format!("{scheme}://{host}")
}
