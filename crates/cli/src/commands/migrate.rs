//! Database migration command.
//!
//! Migration files live in `crates/api/migrations/` and are embedded at
//! compile time, so the binary carries its own schema history.

use secrecy::ExposeSecret;
use sqlx::PgPool;

use super::CliError;

/// Run pending database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
