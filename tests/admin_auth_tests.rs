use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use ovation::config::Config;
use ovation::db::FeedbackStorage;
use ovation::router::{AppState, app_router};
use ovation::service::FeedbackService;
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

async fn test_app(tag: &str) -> (Router, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut db_path = std::env::temp_dir();
    db_path.push(format!(
        "ovation-auth-{}-{}-{}.sqlite",
        tag,
        std::process::id(),
        nanos
    ));

    let mut cfg = Config::default();
    cfg.database_url = format!("sqlite:{}", db_path.display());

    let pool = ovation::db::connect(&cfg.database_url)
        .await
        .expect("failed to open test database");
    let storage = FeedbackStorage::new(pool);
    storage
        .init_schema(&cfg.admin_password)
        .await
        .expect("failed to init schema");

    let cfg = Arc::new(cfg);
    let service = FeedbackService::new(storage, cfg.clone());
    let state = AppState::new(service, &cfg);
    (app_router(state), db_path)
}

async fn post_login(app: &Router, password: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(format!("password={password}")))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed")
}

fn session_cookie(resp: &axum::response::Response) -> String {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

async fn change_password(app: &Router, cookie: &str, payload: Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/change-password")
                .header("content-type", "application/json")
                .header(header::COOKIE, cookie)
                .body(Body::from(payload.to_string()))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed")
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not valid JSON")
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("response body was not utf-8")
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let (app, db_path) = test_app("wrong-password").await;

    let resp = post_login(&app, "not-the-password").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    let page = body_text(resp).await;
    assert!(page.contains("Invalid password"));

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn login_then_logout_returns_to_anonymous() {
    let (app, db_path) = test_app("roundtrip").await;

    let resp = post_login(&app, "admin123").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/dashboard")
    );
    let cookie = session_cookie(&resp);
    assert!(!cookie.is_empty());

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/dashboard")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/login")
    );

    // the browser drops the cookie after the logout response
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/dashboard")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/login")
    );

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn change_password_requires_login() {
    let (app, db_path) = test_app("pw-guard").await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/change-password")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "current_password": "admin123",
                        "new_password": "hunter2",
                        "confirm_password": "hunter2"
                    })
                    .to_string(),
                ))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn change_password_validates_fields() {
    let (app, db_path) = test_app("pw-validate").await;

    let resp = post_login(&app, "admin123").await;
    let cookie = session_cookie(&resp);

    // mismatched confirmation fails even when `current` is wrong too
    let resp = change_password(
        &app,
        &cookie,
        json!({
            "current_password": "completely-wrong",
            "new_password": "abcd",
            "confirm_password": "abce"
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "New passwords do not match");
    assert_eq!(body["success"], json!(false));

    let resp = change_password(
        &app,
        &cookie,
        json!({
            "current_password": "",
            "new_password": "abcd",
            "confirm_password": "abcd"
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "All fields are required");

    let resp = change_password(
        &app,
        &cookie,
        json!({
            "current_password": "admin123",
            "new_password": "abc",
            "confirm_password": "abc"
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(resp).await["error"],
        "Password must be at least 4 characters long"
    );

    let resp = change_password(
        &app,
        &cookie,
        json!({
            "current_password": "not-current",
            "new_password": "abcd",
            "confirm_password": "abcd"
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "Current password is incorrect");

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn change_password_rotates_which_login_works() {
    let (app, db_path) = test_app("pw-rotate").await;

    let resp = post_login(&app, "admin123").await;
    let cookie = session_cookie(&resp);

    let resp = change_password(
        &app,
        &cookie,
        json!({
            "current_password": "admin123",
            "new_password": "hunter2",
            "confirm_password": "hunter2"
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["message"], "Password changed successfully");
    assert_eq!(body["success"], json!(true));

    // the old password no longer logs in
    let resp = post_login(&app, "admin123").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Invalid password"));

    // the new one does
    let resp = post_login(&app, "hunter2").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let _ = fs::remove_file(&db_path);
}
