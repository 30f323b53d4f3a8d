//! User profile and role administration.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_role_update_requires_admin() {
    let app = TestApp::new();
    let bob = app.register("bob", "secret1").await;
    let admin = app.register_admin("root", "secret1").await;
    let path = format!("/users/{}/role", bob.user_id);

    let denied = app
        .request(
            "PATCH",
            &path,
            Some(serde_json::json!({"role": "admin"})),
            Some(&bob.token),
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.error(), "Forbidden: admin access required");

    let listing = app.request("GET", "/users", None, Some(&bob.token)).await;
    assert_eq!(listing.status, StatusCode::FORBIDDEN);

    let granted = app
        .request(
            "PATCH",
            &path,
            Some(serde_json::json!({"role": "admin"})),
            Some(&admin.token),
        )
        .await;
    assert_eq!(granted.status, StatusCode::NO_CONTENT);

    // The existing session picks up the new role on the next request.
    let listing = app.request("GET", "/users", None, Some(&bob.token)).await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_role_update_rejects_unknown_role() {
    let app = TestApp::new();
    let bob = app.register("bob", "secret1").await;
    let admin = app.register_admin("root", "secret1").await;

    let response = app
        .request(
            "PATCH",
            &format!("/users/{}/role", bob.user_id),
            Some(serde_json::json!({"role": "superuser"})),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Invalid role provided");

    let anonymous = app
        .request(
            "PATCH",
            &format!("/users/{}/role", bob.user_id),
            Some(serde_json::json!({"role": "admin"})),
            None,
        )
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_username_update_rules() {
    let app = TestApp::new();
    let alice = app.register("alice", "secret1").await;
    let bob = app.register("bob", "secret1").await;
    let admin = app.register_admin("root", "secret1").await;

    let response = app
        .request(
            "PATCH",
            &format!("/users/{}", alice.user_id),
            Some(serde_json::json!({"username": "mallory"})),
            Some(&bob.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error(), "You can only update your own username");

    let response = app
        .request(
            "PATCH",
            &format!("/users/{}", alice.user_id),
            Some(serde_json::json!({"username": "bob"})),
            Some(&alice.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Username is already taken");

    let response = app
        .request(
            "PATCH",
            &format!("/users/{}", alice.user_id),
            Some(serde_json::json!({"username": "alicia"})),
            Some(&alice.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "alicia");

    // Keeping the current name is not a conflict.
    let response = app
        .request(
            "PATCH",
            &format!("/users/{}", alice.user_id),
            Some(serde_json::json!({"username": "alicia"})),
            Some(&alice.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "alicia");

    let response = app
        .request(
            "PATCH",
            &format!("/users/{}", bob.user_id),
            Some(serde_json::json!({"username": "robert"})),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "robert");
}

#[tokio::test]
async fn test_get_user() {
    let app = TestApp::new();
    let alice = app.register("alice", "secret1").await;
    let bob = app.register("bob", "secret1").await;

    let response = app
        .request("GET", &format!("/users/{}", alice.user_id), None, Some(&bob.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], alice.email);
    assert_eq!(response.body["role"], "user");

    let response = app
        .request("GET", "/users/not-a-uuid", None, Some(&bob.token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Invalid UUID: not-a-uuid");

    let response = app
        .request("GET", &format!("/users/{}", alice.user_id), None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_users_filters() {
    let app = TestApp::new();
    app.register("alice", "secret1").await;
    app.register("bob", "secret1").await;
    let admin = app.register_admin("root", "secret1").await;

    let response = app
        .request("GET", "/users?search=ALI", None, Some(&admin.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let users = response.body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "alice");

    let response = app
        .request("GET", "/users?role=admin", None, Some(&admin.token))
        .await;
    assert_eq!(response.body.as_array().unwrap().len(), 1);

    let response = app
        .request("GET", "/users?order_by=username:asc", None, Some(&admin.token))
        .await;
    let names: Vec<_> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["alice", "bob", "root"]);

    let response = app
        .request("GET", "/users?order_by=password_hash:asc", None, Some(&admin.token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
