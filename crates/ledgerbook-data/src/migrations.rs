//! Embedded schema migrations

use sqlx::PgPool;
use sqlx::migrate::MigrateError;
use tracing::info;

/// Run all pending migrations from the crate's `migrations/` directory
///
/// sqlx serializes concurrent runners through its own advisory lock, so
/// this is safe to call from every instance at startup.
///
/// # Errors
///
/// Returns a [`MigrateError`] if a migration fails or the migration
/// history table is in a conflicting state
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations complete");
    Ok(())
}
