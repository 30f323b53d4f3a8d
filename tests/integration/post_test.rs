//! Posts: visibility, revision chains and deletion.

use axum::http::StatusCode;
use serde_json::Value;

use crate::helpers::TestApp;

fn post_ids(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|p| p["post_id"].as_str().unwrap().to_string())
        .collect()
}

async fn create_post(app: &TestApp, token: &str, title: &str, public: bool) -> String {
    let response = app
        .request(
            "POST",
            "/posts",
            Some(serde_json::json!({
                "title": title,
                "content": format!("{title} body"),
                "public": public,
            })),
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.body["post_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_private_post_visibility() {
    let app = TestApp::new();
    let alice = app.register("alice", "secret1").await;
    let bob = app.register("bob", "secret1").await;
    let admin = app.register_admin("root", "secret1").await;

    let private = create_post(&app, &alice.token, "diary", false).await;
    let public = create_post(&app, &alice.token, "announcement", true).await;
    let path = format!("/posts/{private}");

    let anonymous = app.request("GET", &path, None, None).await;
    assert_eq!(anonymous.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(anonymous.error(), "Failed to get post");

    let other = app.request("GET", &path, None, Some(&bob.token)).await;
    assert_eq!(other.status, StatusCode::INTERNAL_SERVER_ERROR);

    let author = app.request("GET", &path, None, Some(&alice.token)).await;
    assert_eq!(author.status, StatusCode::OK);
    assert_eq!(author.body["title"], "diary");
    assert_eq!(author.body["username"], "alice");

    let moderator = app.request("GET", &path, None, Some(&admin.token)).await;
    assert_eq!(moderator.status, StatusCode::OK);

    let listing = app.request("GET", "/posts", None, None).await;
    assert_eq!(post_ids(&listing.body), [public.clone()]);

    let listing = app.request("GET", "/posts", None, Some(&bob.token)).await;
    assert_eq!(post_ids(&listing.body), [public.clone()]);

    let listing = app.request("GET", "/posts", None, Some(&alice.token)).await;
    assert_eq!(post_ids(&listing.body).len(), 2);

    // Admins list like everyone else: own plus public.
    let listing = app.request("GET", "/posts", None, Some(&admin.token)).await;
    assert_eq!(post_ids(&listing.body), [public.clone()]);

    // A forged public=false filter cannot widen what an anonymous caller sees.
    let listing = app.request("GET", "/posts?public=false", None, None).await;
    assert!(post_ids(&listing.body).is_empty());
}

#[tokio::test]
async fn test_revision_chain() {
    let app = TestApp::new();
    let alice = app.register("alice", "secret1").await;
    let admin = app.register_admin("root", "secret1").await;

    let original = create_post(&app, &alice.token, "draft", true).await;

    let first = app
        .request(
            "PATCH",
            &format!("/posts/{original}"),
            Some(serde_json::json!({"title": "second draft"})),
            Some(&alice.token),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);
    let first_id = first.body["post_id"].as_str().unwrap().to_string();
    assert_ne!(first_id, original);

    // Editing through a revision id extends the same chain; an admin
    // edit keeps the original author.
    let second = app
        .request(
            "PATCH",
            &format!("/posts/{first_id}"),
            Some(serde_json::json!({"content": "moderated"})),
            Some(&admin.token),
        )
        .await;
    assert_eq!(second.status, StatusCode::OK);

    let current = app
        .request("GET", &format!("/posts/{original}"), None, None)
        .await;
    assert_eq!(current.body["revision_number"], 2);
    assert_eq!(current.body["title"], "second draft");
    assert_eq!(current.body["content"], "moderated");
    assert_eq!(current.body["user_id"], alice.user_id.to_string());

    let revisions = app
        .request("GET", &format!("/posts/{first_id}/revisions"), None, None)
        .await;
    assert_eq!(revisions.status, StatusCode::OK);
    let rows = revisions.body.as_array().unwrap();
    let numbers: Vec<i64> = rows
        .iter()
        .map(|r| r["revision_number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, [0, 1, 2]);
    assert!(rows[0]["original_chain_id"].is_null());
    for row in &rows[1..] {
        assert_eq!(row["original_chain_id"], original.as_str());
        assert_eq!(row["user_id"], alice.user_id.to_string());
    }

    let listing = app.request("GET", "/posts", None, None).await;
    assert_eq!(listing.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_only_author_or_admin_may_write() {
    let app = TestApp::new();
    let alice = app.register("alice", "secret1").await;
    let bob = app.register("bob", "secret1").await;

    let post_id = create_post(&app, &alice.token, "mine", true).await;
    let path = format!("/posts/{post_id}");

    let edit = app
        .request(
            "PATCH",
            &path,
            Some(serde_json::json!({"title": "yours"})),
            Some(&bob.token),
        )
        .await;
    assert_eq!(edit.status, StatusCode::FORBIDDEN);
    assert_eq!(edit.error(), "You can only modify your own posts");

    let delete = app.request("DELETE", &path, None, Some(&bob.token)).await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let anonymous = app
        .request("PATCH", &path, Some(serde_json::json!({"title": "x"})), None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_cascades_over_chain() {
    let app = TestApp::new();
    let alice = app.register("alice", "secret1").await;

    let original = create_post(&app, &alice.token, "short lived", true).await;
    let revision = app
        .request(
            "PATCH",
            &format!("/posts/{original}"),
            Some(serde_json::json!({"public": false})),
            Some(&alice.token),
        )
        .await;
    let revision_id = revision.body["post_id"].as_str().unwrap().to_string();

    let response = app
        .request("DELETE", &format!("/posts/{revision_id}"), None, Some(&alice.token))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    for id in [&original, &revision_id] {
        let response = app
            .request("GET", &format!("/posts/{id}"), None, Some(&alice.token))
            .await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    let again = app
        .request("DELETE", &format!("/posts/{original}"), None, Some(&alice.token))
        .await;
    assert_eq!(again.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(again.error(), "Failed to delete post");

    let listing = app.request("GET", "/posts", None, Some(&alice.token)).await;
    assert!(post_ids(&listing.body).is_empty());
}

#[tokio::test]
async fn test_post_input_validation() {
    let app = TestApp::new();
    let alice = app.register("alice", "secret1").await;

    let response = app
        .request(
            "POST",
            "/posts",
            Some(serde_json::json!({"title": "", "content": "x"})),
            Some(&alice.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Title is required");

    let response = app
        .request("GET", "/posts?order_by=deleted_at:asc", None, None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app.request("GET", "/posts/12345", None, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Invalid UUID: 12345");
}

#[tokio::test]
async fn test_list_search_and_order() {
    let app = TestApp::new();
    let alice = app.register("alice", "secret1").await;

    create_post(&app, &alice.token, "Rust tips", true).await;
    create_post(&app, &alice.token, "Gardening", true).await;
    create_post(&app, &alice.token, "rusty bikes", true).await;

    let response = app
        .request("GET", "/posts?search=rust&order_by=title:asc", None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let titles: Vec<_> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&"Rust tips".to_string()));
    assert!(titles.contains(&"rusty bikes".to_string()));

    let response = app
        .request(
            "GET",
            &format!("/posts?author={}", alice.user_id),
            None,
            None,
        )
        .await;
    assert_eq!(response.body.as_array().unwrap().len(), 3);
}
