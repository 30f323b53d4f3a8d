//! Periodic purge of expired session rows.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{error, info};

use citadel_core::error::AppError;

use super::manager::SessionManager;

/// Reclaims storage held by expired sessions.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    /// Manager owning the session store.
    manager: Arc<SessionManager>,
}

impl SessionCleanup {
    /// Creates a new cleanup handler.
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }

    /// Runs one cleanup cycle. Returns the number of rows removed.
    pub async fn run_cleanup(&self) -> Result<u64, AppError> {
        let removed = self.manager.purge_expired().await?;
        if removed > 0 {
            info!(removed, "Expired sessions purged");
        }
        Ok(removed)
    }

    /// Runs a cleanup cycle every `interval` until `cancel` flips to true.
    pub async fn run(&self, interval: Duration, mut cancel: watch::Receiver<bool>) {
        info!(interval_secs = interval.as_secs(), "Session cleanup started");

        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.run_cleanup().await {
                        error!(error = %e, "Session cleanup failed");
                    }
                }
            }
        }

        info!("Session cleanup stopped");
    }
}

#[cfg(test)]
mod tests {
    use citadel_database::MemoryStore;
    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn test_run_cleanup_counts_removed_rows() {
        let store = MemoryStore::new();
        let expired = Arc::new(SessionManager::new(
            Arc::new(store.clone()),
            chrono::Duration::zero(),
        ));
        let live = SessionManager::new(Arc::new(store.clone()), chrono::Duration::hours(1));

        expired.create(Uuid::new_v4()).await.unwrap();
        expired.create(Uuid::new_v4()).await.unwrap();
        live.create(Uuid::new_v4()).await.unwrap();

        let cleanup = SessionCleanup::new(expired);
        assert_eq!(cleanup.run_cleanup().await.unwrap(), 2);
        assert_eq!(cleanup.run_cleanup().await.unwrap(), 0);
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_cancel() {
        let manager = Arc::new(SessionManager::new(
            Arc::new(MemoryStore::new()),
            chrono::Duration::hours(1),
        ));
        let cleanup = SessionCleanup::new(manager);
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            cleanup.run(Duration::from_secs(60), rx).await;
        });
        time::sleep(Duration::from_secs(130)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
