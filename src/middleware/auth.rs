use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};

/// Session cookie carried by an authenticated admin. The jar is private
/// (encrypted and authenticated), so the value cannot be forged or read
/// client-side.
pub const SESSION_COOKIE: &str = "ovation_session";
const SESSION_VALUE: &str = "admin";

pub fn session_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(
        SESSION_COOKIE.to_string(),
        SESSION_VALUE.to_string(),
    ))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE.to_string(), String::new()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn is_logged_in(jar: &PrivateCookieJar) -> bool {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value() == SESSION_VALUE)
        .unwrap_or(false)
}

/// Guard for admin-only routes. Anonymous callers are sent to the login
/// page instead of being handed an error status.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(infallible) => match infallible {},
        };
        if is_logged_in(&jar) {
            Ok(Self)
        } else {
            Err(Redirect::to("/login"))
        }
    }
}
