//! Registration, login, logout and token transport.

use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_register_login_logout_flow() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/register",
            Some(serde_json::json!({
                "username": "alice",
                "email": "alice@x.com",
                "password": "secret1",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let cookie = response.set_cookie().expect("register sets a cookie");
    assert!(cookie.starts_with("TOKEN="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=86400"));
    assert_eq!(response.session_id().len(), 64);

    let response = app
        .request(
            "POST",
            "/login",
            Some(serde_json::json!({"email": "alice@x.com", "password": "secret1"})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let token = response.session_id();

    let me = app.request("GET", "/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "alice");
    assert!(me.body.get("password_hash").is_none());
    assert!(me.body.get("salt").is_none());

    let wrong = app
        .request(
            "POST",
            "/login",
            Some(serde_json::json!({"email": "alice@x.com", "password": "nope"})),
            None,
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.error(), "Invalid email or password");

    let logout = app.request("POST", "/logout", None, Some(&token)).await;
    assert_eq!(logout.status, StatusCode::NO_CONTENT);
    assert!(logout.set_cookie().unwrap().contains("Max-Age=0"));

    let me = app.request("GET", "/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    assert_eq!(me.error(), "Invalid or expired session");
}

#[tokio::test]
async fn test_unknown_email_looks_like_wrong_password() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/login",
            Some(serde_json::json!({"email": "ghost@x.com", "password": "secret1"})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "Invalid email or password");
}

#[tokio::test]
async fn test_basic_credentials() {
    let app = TestApp::new();
    let basic = format!("Basic {}", STANDARD.encode("carol@x.com:secret1"));

    let response = app
        .request_with_headers(
            "POST",
            "/register",
            Some(serde_json::json!({"username": "carol"})),
            &[("authorization", basic.clone())],
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

    let response = app
        .request_with_headers("POST", "/login", None, &[("authorization", basic)])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.set_cookie().is_some());
}

#[tokio::test]
async fn test_register_rejections() {
    let app = TestApp::new();
    app.register("alice", "secret1").await;

    let taken = app
        .request(
            "POST",
            "/register",
            Some(serde_json::json!({
                "username": "alice",
                "email": "other@x.com",
                "password": "secret1",
            })),
            None,
        )
        .await;
    assert_eq!(taken.status, StatusCode::BAD_REQUEST);
    assert_eq!(taken.error(), "Username is already taken");

    let short = app
        .request(
            "POST",
            "/register",
            Some(serde_json::json!({
                "username": "bob",
                "email": "bob@x.com",
                "password": "123",
            })),
            None,
        )
        .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert_eq!(short.error(), "Password must be at least 6 characters long");

    let missing = app
        .request(
            "POST",
            "/register",
            Some(serde_json::json!({"username": "dave"})),
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let garbage = app
        .request_with_headers("POST", "/register", None, &[])
        .await;
    assert_eq!(garbage.status, StatusCode::BAD_REQUEST);
    assert_eq!(garbage.error(), "Invalid request body");
}

#[tokio::test]
async fn test_bearer_fallback_and_missing_token() {
    let app = TestApp::new();
    let alice = app.register("alice", "secret1").await;

    let response = app.request_bearer("GET", "/me", None, &alice.token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user_id"], alice.user_id.to_string());

    let response = app.request("GET", "/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "Authentication required");

    let response = app.request_bearer("GET", "/me", None, "deadbeef").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "Invalid or expired session");
}

#[tokio::test]
async fn test_logout_without_session_still_succeeds() {
    let app = TestApp::new();
    let response = app.request("POST", "/logout", None, Some("not-a-session")).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.set_cookie().unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn test_cors_preflight_and_health() {
    let app = TestApp::new();

    let response = app
        .request_with_headers(
            "OPTIONS",
            "/me",
            None,
            &[
                ("origin", "https://app.example".to_string()),
                ("access-control-request-method", "GET".to_string()),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers["access-control-allow-origin"],
        "https://app.example"
    );
    assert_eq!(response.headers["access-control-allow-credentials"], "true");

    let health = app.request("GET", "/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");

    let missing = app.request("GET", "/nope", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.error(), "Not found");
}
