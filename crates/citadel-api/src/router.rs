//! Route table.
//!
//! Routes are grouped by the chain that guards them. Each group gets its
//! guard stages through [`Chain::apply`]; the edge stages and the request
//! timeout wrap the merged router once.

use std::time::Duration;

use axum::Router;
use axum::routing::{get, patch, post};
use tower_http::timeout::TimeoutLayer;
use tracing::debug;

use crate::handlers;
use crate::middleware::Chain;
use crate::state::AppState;

/// Build the complete application router.
pub fn build_router(state: AppState) -> Router {
    let public_chain: Chain = Chain::public().into();
    let optional_chain = Chain::public().with_optional_authentication();
    let authenticated_chain: Chain = Chain::public().authenticated().into();
    let admin_chain = Chain::public().authenticated().admin();

    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout));

    let optional = Router::new()
        .route("/posts", get(handlers::post::list_posts))
        .route("/posts/{id}", get(handlers::post::get_post))
        .route("/posts/{id}/revisions", get(handlers::post::list_revisions));

    let authenticated = Router::new()
        .route("/me", get(handlers::me::get_me))
        .route(
            "/me/sessions",
            get(handlers::me::list_my_sessions).delete(handlers::me::revoke_my_sessions),
        )
        .route(
            "/users/{id}",
            get(handlers::user::get_user).patch(handlers::user::update_user),
        )
        .route("/posts", post(handlers::post::create_post))
        .route(
            "/posts/{id}",
            patch(handlers::post::update_post).delete(handlers::post::delete_post),
        );

    let admin = Router::new()
        .route("/users", get(handlers::user::list_users))
        .route("/users/{id}/role", patch(handlers::user::update_role))
        .route(
            "/users/{id}/sessions",
            get(handlers::session::list_user_sessions)
                .delete(handlers::session::revoke_user_sessions),
        )
        .route(
            "/sessions/{id}",
            get(handlers::session::get_session).delete(handlers::session::revoke_session),
        );

    for (name, chain) in [
        ("public", &public_chain),
        ("optional", &optional_chain),
        ("authenticated", &authenticated_chain),
        ("admin", &admin_chain),
    ] {
        debug!(group = name, chain = %chain, "Route group");
    }

    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let app = Router::new()
        .merge(public_chain.apply(public, &state))
        .merge(optional_chain.apply(optional, &state))
        .merge(authenticated_chain.apply(authenticated, &state))
        .merge(admin_chain.apply(admin, &state))
        .fallback(handlers::not_found)
        .layer(TimeoutLayer::new(timeout))
        .with_state(state.clone());

    Chain::apply_edge(app, &state)
}
