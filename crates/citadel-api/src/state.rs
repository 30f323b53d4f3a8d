//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use citadel_auth::password::{CredentialStore, PasswordPolicy};
use citadel_auth::session::SessionManager;
use citadel_core::config::AppConfig;
use citadel_core::error::AppError;
use citadel_database::Stores;
use citadel_service::{PostService, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Store handles.
    pub stores: Stores,
    /// Session issuing and validation.
    pub session_manager: Arc<SessionManager>,
    /// Account operations.
    pub user_service: Arc<UserService>,
    /// Post operations.
    pub post_service: Arc<PostService>,
}

impl AppState {
    /// Wires every service on top of `stores`.
    pub fn new(config: AppConfig, stores: Stores) -> Result<Self, AppError> {
        let credentials = Arc::new(CredentialStore::new(&config.auth)?);
        let session_manager = Arc::new(SessionManager::from_config(
            stores.sessions.clone(),
            &config.session,
        ));
        let user_service = Arc::new(UserService::new(
            stores.users.clone(),
            credentials,
            PasswordPolicy::new(&config.auth),
            Arc::clone(&session_manager),
        ));
        let post_service = Arc::new(PostService::new(
            stores.posts.clone(),
            stores.users.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            stores,
            session_manager,
            user_service,
            post_service,
        })
    }
}
