//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use citadel_api::AppState;
use citadel_core::config::AppConfig;
use citadel_database::{MemoryStore, Stores, UserStore};
use citadel_entity::user::UserRole;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Store handle for direct inspection
    pub store: MemoryStore,
    /// Application config
    pub config: AppConfig,
}

/// A registered account and the token of its first session.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.scrypt_log_n = 4;

        let store = MemoryStore::new();
        let state = AppState::new(config.clone(), Stores::from_memory(store.clone()))
            .expect("Failed to build app state");
        let router = citadel_api::build_router(state);

        Self {
            router,
            store,
            config,
        }
    }

    /// Register through the API and return the new account.
    pub async fn register(&self, username: &str, password: &str) -> TestUser {
        let email = format!("{username}@test.com");
        let response = self
            .request(
                "POST",
                "/register",
                Some(serde_json::json!({
                    "username": username,
                    "email": email,
                    "password": password,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Register failed: {:?}",
            response.body
        );

        TestUser {
            user_id: response.body["user_id"]
                .as_str()
                .and_then(|id| id.parse().ok())
                .expect("No user_id in register response"),
            email,
            token: response.session_id(),
        }
    }

    /// Register an account and promote it to admin.
    pub async fn register_admin(&self, username: &str, password: &str) -> TestUser {
        let user = self.register(username, password).await;
        UserStore::update_role(&self.store, user.user_id, UserRole::Admin)
            .await
            .expect("Failed to promote admin");
        user
    }

    /// Login and return the session token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/login",
                Some(serde_json::json!({
                    "email": email,
                    "password": password,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response.session_id()
    }

    /// Make an HTTP request, sending `token` as the session cookie.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut headers = Vec::new();
        if let Some(token) = token {
            headers.push((COOKIE.as_str(), format!("{}={token}", self.config.session.cookie_name)));
        }
        self.request_with_headers(method, path, body, &headers).await
    }

    /// Make an HTTP request, sending `token` as a bearer token.
    pub async fn request_bearer(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: &str,
    ) -> TestResponse {
        let headers = [(AUTHORIZATION.as_str(), format!("Bearer {token}"))];
        self.request_with_headers(method, path, body, &headers).await
    }

    /// Make an HTTP request with explicit headers.
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, String)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(CONTENT_TYPE, "application/json");

        for (name, value) in headers {
            req = req.header(*name, value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `Set-Cookie` header, if any.
    pub fn set_cookie(&self) -> Option<&str> {
        self.headers.get(SET_COOKIE).and_then(|v| v.to_str().ok())
    }

    /// `session_id` from a session body.
    pub fn session_id(&self) -> String {
        self.body["session_id"]
            .as_str()
            .expect("No session_id in response")
            .to_string()
    }

    /// The `error` message of an error body.
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
