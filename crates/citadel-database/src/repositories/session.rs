//! Session repository implementation.

use async_trait::async_trait;
use chrono::Duration;
use sqlx::PgPool;
use uuid::Uuid;

use citadel_core::error::{AppError, ErrorKind};
use citadel_core::result::AppResult;
use citadel_entity::session::Session;

use crate::store::SessionStore;

/// Repository for session rows. All expiry comparisons use the
/// database clock (`NOW()`).
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn create(
        &self,
        session_id: &str,
        user_id: Uuid,
        lifetime: Duration,
    ) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (session_id, user_id, expires_at) \
             VALUES ($1, $2, NOW() + make_interval(secs => $3)) \
             RETURNING *",
        )
        .bind(session_id)
        .bind(user_id)
        .bind(lifetime.num_seconds() as f64)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    async fn find_valid(&self, session_id: &str) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE session_id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to validate session", e))
    }

    async fn find_by_id(&self, session_id: &str) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    async fn delete(&self, session_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete session", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete user sessions", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE user_id = $1 ORDER BY expires_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sessions", e))
    }

    async fn delete_expired(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge expired sessions", e)
            })?;
        Ok(result.rows_affected())
    }
}
