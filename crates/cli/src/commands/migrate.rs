//! Database migration command.
//!
//! Migration files live in `crates/tracker/migrations/`; the session table
//! is created by the session store itself.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CommandError, connect};

/// Run document migrations, then the session store migration.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running document migrations...");
    sqlx::migrate!("../tracker/migrations").run(&pool).await?;

    tracing::info!("Running session store migration...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
