//! User repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use citadel_core::error::{AppError, ErrorKind};
use citadel_core::result::AppResult;
use citadel_entity::user::{CreateUser, USER_SORT_COLUMNS, User, UserFilter, UserRole};

use super::{like_pattern, push_order_by};
use crate::store::UserStore;

/// Repository for user CRUD and query operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique(e: sqlx::Error, fallback: &'static str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_username_key") => {
            AppError::conflict("Username is already taken")
        }
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
            AppError::conflict("Email is already registered")
        }
        _ => AppError::with_source(ErrorKind::Database, fallback, e),
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, data: CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (user_id, username, email, password_hash, salt, role) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.salt)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique(e, "Failed to create user"))
    }

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    async fn username_taken(&self, username: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check username", e))
    }

    async fn list(&self, filter: &UserFilter) -> AppResult<Vec<User>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM users WHERE TRUE");

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = like_pattern(search);
            qb.push(" AND (LOWER(username) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(email) LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(role) = filter.role {
            qb.push(" AND role = ").push_bind(role);
        }
        push_order_by(
            &mut qb,
            &filter.order_by,
            USER_SORT_COLUMNS,
            "",
            "created_at DESC",
        )?;

        qb.build_query_as::<User>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))
    }

    async fn update_username(&self, user_id: Uuid, username: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET username = $2, updated_at = NOW() WHERE user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique(e, "Failed to update username"))?
        .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn update_role(&self, user_id: Uuid, role: UserRole) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update role", e))?
        .ok_or_else(|| AppError::not_found("User not found"))
    }
}
