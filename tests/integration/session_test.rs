//! Session listing and revocation.

use axum::http::StatusCode;

use citadel_database::SessionStore;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_my_sessions_and_logout_everywhere() {
    let app = TestApp::new();
    let alice = app.register("alice", "secret1").await;
    let second = app.login(&alice.email, "secret1").await;

    let response = app.request("GET", "/me/sessions", None, Some(&second)).await;
    assert_eq!(response.status, StatusCode::OK);
    let sessions = response.body.as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert!(sessions.iter().all(|s| s["user_id"] == alice.user_id.to_string()));

    let response = app.request("DELETE", "/me/sessions", None, Some(&second)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.set_cookie().unwrap().contains("Max-Age=0"));

    for token in [&alice.token, &second] {
        let me = app.request("GET", "/me", None, Some(token)).await;
        assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    }
    assert_eq!(app.store.session_count().await, 0);
}

#[tokio::test]
async fn test_admin_session_management() {
    let app = TestApp::new();
    let alice = app.register("alice", "secret1").await;
    let admin = app.register_admin("root", "secret1").await;

    let listing = app
        .request(
            "GET",
            &format!("/users/{}/sessions", alice.user_id),
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body.as_array().unwrap().len(), 1);

    let single = app
        .request("GET", &format!("/sessions/{}", alice.token), None, Some(&admin.token))
        .await;
    assert_eq!(single.status, StatusCode::OK);
    assert_eq!(single.body["user_id"], alice.user_id.to_string());

    let revoke = app
        .request("DELETE", &format!("/sessions/{}", alice.token), None, Some(&admin.token))
        .await;
    assert_eq!(revoke.status, StatusCode::NO_CONTENT);

    let me = app.request("GET", "/me", None, Some(&alice.token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let missing = app
        .request("GET", &format!("/sessions/{}", alice.token), None, Some(&admin.token))
        .await;
    assert_eq!(missing.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(missing.error(), "Failed to retrieve session");

    let relogin = app.login(&alice.email, "secret1").await;
    let revoke_all = app
        .request(
            "DELETE",
            &format!("/users/{}/sessions", alice.user_id),
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(revoke_all.status, StatusCode::NO_CONTENT);
    let me = app.request("GET", "/me", None, Some(&relogin)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_routes_are_admin_only() {
    let app = TestApp::new();
    let alice = app.register("alice", "secret1").await;

    let response = app
        .request("GET", &format!("/sessions/{}", alice.token), None, Some(&alice.token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error(), "Forbidden: admin access required");

    let response = app
        .request("DELETE", &format!("/users/{}/sessions", alice.user_id), None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "Authentication required");
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let app = TestApp::new();
    let alice = app.register("alice", "secret1").await;

    let expired = "ab".repeat(32);
    SessionStore::create(&app.store, &expired, alice.user_id, chrono::Duration::seconds(-1))
        .await
        .unwrap();

    let me = app.request("GET", "/me", None, Some(&expired)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    assert_eq!(me.error(), "Invalid or expired session");

    // Optional authentication falls back to anonymous instead of failing.
    let posts = app.request("GET", "/posts", None, Some(&expired)).await;
    assert_eq!(posts.status, StatusCode::OK);
}
