use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use citadel_core::result::AppResult;
use citadel_entity::session::Session;

use super::MemoryStore;
use crate::store::SessionStore;

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(
        &self,
        session_id: &str,
        user_id: Uuid,
        lifetime: Duration,
    ) -> AppResult<Session> {
        let now = Utc::now();
        let session = Session {
            session_id: session_id.to_string(),
            user_id,
            expires_at: now + lifetime,
            created_at: now,
        };
        self.tables
            .lock()
            .await
            .sessions
            .insert(session.session_id.clone(), session.clone());
        Ok(session)
    }

    async fn find_valid(&self, session_id: &str) -> AppResult<Option<Session>> {
        let now = Utc::now();
        let tables = self.tables.lock().await;
        Ok(tables
            .sessions
            .get(session_id)
            .filter(|s| !s.is_expired_at(now))
            .cloned())
    }

    async fn find_by_id(&self, session_id: &str) -> AppResult<Option<Session>> {
        Ok(self.tables.lock().await.sessions.get(session_id).cloned())
    }

    async fn delete(&self, session_id: &str) -> AppResult<bool> {
        Ok(self
            .tables
            .lock()
            .await
            .sessions
            .remove(session_id)
            .is_some())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> AppResult<u64> {
        let mut tables = self.tables.lock().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| s.user_id != user_id);
        Ok((before - tables.sessions.len()) as u64)
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        let tables = self.tables.lock().await;
        let mut sessions: Vec<Session> = tables
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.expires_at.cmp(&a.expires_at));
        Ok(sessions)
    }

    async fn delete_expired(&self) -> AppResult<u64> {
        let now = Utc::now();
        let mut tables = self.tables.lock().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| !s.is_expired_at(now));
        Ok((before - tables.sessions.len()) as u64)
    }
}
