//! Embedded schema migrations.

use sqlx::PgPool;
use tracing::info;

use citadel_core::error::{AppError, ErrorKind};

/// Run all pending database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to run migrations", e))?;

    info!("Database migrations completed");
    Ok(())
}
