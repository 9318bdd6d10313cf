use crate::config::Config;
use crate::handlers::{api, pages};
use crate::service::FeedbackService;
use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum_extra::extract::cookie::Key;

#[derive(Clone)]
pub struct AppState {
    pub service: FeedbackService,
    key: Key,
}

impl AppState {
    pub fn new(service: FeedbackService, config: &Config) -> Self {
        Self {
            service,
            key: config.session_key(),
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::feedback_page))
        .route("/feedback", get(pages::feedback_page))
        .route("/login", get(pages::login_page).post(pages::login_submit))
        .route("/logout", get(pages::logout))
        .route("/dashboard", get(pages::dashboard))
        .route("/qr", get(api::qr_code))
        .route(
            "/api/feedback",
            get(api::list_feedback).post(api::submit_feedback),
        )
        .route("/api/stats", get(api::feedback_stats))
        .route("/api/change-password", post(api::change_password))
        .with_state(state)
}
