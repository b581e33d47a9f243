use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::StorageError;

/// Recommendation sessions are written once per request, so a small pool suffices
const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the session store's connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await?;

    tracing::info!(max_connections = MAX_CONNECTIONS, "Connected to PostgreSQL");
    Ok(pool)
}

/// Applies the embedded `food_reco` schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
