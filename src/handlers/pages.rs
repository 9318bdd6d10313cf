use crate::error::AppError;
use crate::middleware::auth::{self, RequireAdmin};
use crate::router::AppState;
use askama::Template;
use axum::Form;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Template)]
#[template(path = "feedback.html")]
struct FeedbackPage;

#[derive(Template)]
#[template(path = "login.html")]
struct LoginPage<'a> {
    error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

/// GET / and /feedback -> public submission form.
pub async fn feedback_page() -> Result<Html<String>, AppError> {
    Ok(Html(FeedbackPage.render()?))
}

/// GET /login
pub async fn login_page() -> Result<Html<String>, AppError> {
    Ok(Html(LoginPage { error: None }.render()?))
}

/// POST /login -> start an admin session when the password matches.
pub async fn login_submit(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if state.service.verify_admin_password(&form.password).await? {
        info!("admin login succeeded");
        let jar = jar.add(auth::session_cookie());
        Ok((jar, Redirect::to("/dashboard")).into_response())
    } else {
        warn!("admin login failed");
        let page = LoginPage {
            error: Some("Invalid password"),
        };
        Ok(Html(page.render()?).into_response())
    }
}

/// GET /logout -> drop the session and return to the login page.
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    let jar = jar.remove(auth::clear_session_cookie());
    (jar, Redirect::to("/login"))
}

/// GET /dashboard (admin only)
pub async fn dashboard(_admin: RequireAdmin) -> Result<Html<String>, AppError> {
    Ok(Html(DashboardPage.render()?))
}
