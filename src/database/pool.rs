use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Connect the process-wide pool. Called once by the composition root and
/// handed to handlers through application state.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    options(config).connect(&config.url).await
}

/// Build a pool without establishing a connection; connections are opened
/// on first use. Test harnesses use this to assemble application state
/// without a reachable database.
pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    options(config).connect_lazy(&config.url)
}

fn options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
}
