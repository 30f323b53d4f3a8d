//! Store traits for each aggregate.
//!
//! Services and the auth crate only ever see these traits. Two
//! implementations exist: PostgreSQL ([`crate::repositories`]) and the
//! in-process [`crate::memory::MemoryStore`]. Both must give the same
//! answers, including the chain-resolution and visibility rules for posts.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use citadel_core::config::DatabaseConfig;
use citadel_core::result::AppResult;
use citadel_entity::post::{NewPost, Post, PostFilter, PostRevision, PostView};
use citadel_entity::session::Session;
use citadel_entity::user::{CreateUser, User, UserFilter, UserRole};

use crate::memory::MemoryStore;
use crate::{connection, migration};
use crate::repositories::{PostRepository, SessionRepository, UserRepository};

/// Persistence for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Insert a new user. Duplicate username or email is a `Conflict`.
    async fn create(&self, data: CreateUser) -> AppResult<User>;

    /// Find a user by primary key.
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by login email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Whether any user already holds `username`.
    async fn username_taken(&self, username: &str) -> AppResult<bool>;

    /// List users matching `filter`.
    async fn list(&self, filter: &UserFilter) -> AppResult<Vec<User>>;

    /// Change a username. `NotFound` if the user is missing, `Conflict` if taken.
    async fn update_username(&self, user_id: Uuid, username: &str) -> AppResult<User>;

    /// Change a role. `NotFound` if the user is missing.
    async fn update_role(&self, user_id: Uuid, role: UserRole) -> AppResult<User>;
}

/// Persistence for login sessions.
///
/// Expiry is always judged by the store's own clock, in the same lookup
/// that checks existence.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Insert a session that expires `lifetime` from now.
    async fn create(
        &self,
        session_id: &str,
        user_id: Uuid,
        lifetime: Duration,
    ) -> AppResult<Session>;

    /// Find a session that exists and has not expired.
    async fn find_valid(&self, session_id: &str) -> AppResult<Option<Session>>;

    /// Find a session row regardless of expiry.
    async fn find_by_id(&self, session_id: &str) -> AppResult<Option<Session>>;

    /// Delete one session. Returns whether a row was removed.
    async fn delete(&self, session_id: &str) -> AppResult<bool>;

    /// Delete every session of a user. Returns the number removed.
    async fn delete_by_user(&self, user_id: Uuid) -> AppResult<u64>;

    /// All sessions of a user, latest expiry first.
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>>;

    /// Delete sessions whose expiry has passed. Returns the number removed.
    async fn delete_expired(&self) -> AppResult<u64>;
}

/// Persistence for revisioned posts.
///
/// Every method taking an id accepts the id of any revision in a chain.
#[async_trait]
pub trait PostStore: Send + Sync + 'static {
    /// Start a new chain at revision 0.
    async fn create(&self, data: NewPost) -> AppResult<Post>;

    /// Highest non-deleted revision of the chain, with author profile.
    async fn get_current(&self, post_id: Uuid) -> AppResult<Option<PostView>>;

    /// Append revision `max + 1` atomically. `NotFound` if the chain is
    /// missing or deleted.
    async fn update(&self, post_id: Uuid, revision: PostRevision) -> AppResult<Post>;

    /// Non-deleted revisions of the chain, ascending.
    async fn list_revisions(&self, post_id: Uuid) -> AppResult<Vec<PostView>>;

    /// Soft-delete every live revision of the chain. Returns the number
    /// of rows marked; 0 means nothing was live.
    async fn delete(&self, post_id: Uuid) -> AppResult<u64>;

    /// Current heads of all live chains matching `filter`.
    async fn list(&self, filter: &PostFilter) -> AppResult<Vec<PostView>>;
}

/// The set of stores one application instance runs against.
#[derive(Clone)]
pub struct Stores {
    /// User store.
    pub users: Arc<dyn UserStore>,
    /// Session store.
    pub sessions: Arc<dyn SessionStore>,
    /// Post store.
    pub posts: Arc<dyn PostStore>,
}

impl Stores {
    /// Stores for `config`: in-process for the `memory` url, otherwise
    /// PostgreSQL, migrated first when `run_migrations` is set.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        if config.is_memory() {
            warn!("Using in-memory stores; all data is lost on exit");
            return Ok(Self::memory());
        }

        let pool = connection::connect(config).await?;
        if config.run_migrations {
            migration::run_migrations(&pool).await?;
        }
        Ok(Self::postgres(pool))
    }

    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            sessions: Arc::new(SessionRepository::new(pool.clone())),
            posts: Arc::new(PostRepository::new(pool)),
        }
    }

    /// In-process stores sharing one set of tables.
    pub fn memory() -> Self {
        Self::from_memory(MemoryStore::new())
    }

    /// Wrap an existing in-process store, keeping a handle for inspection.
    pub fn from_memory(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            sessions: Arc::new(store.clone()),
            posts: Arc::new(store),
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
