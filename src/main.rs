use std::sync::Arc;

use taskify_api::app::{app, AppState};
use taskify_api::config::AppConfig;
use taskify_api::database::pool;
use taskify_api::identity::IdentityClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, secrets, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    tracing::info!("starting taskify-api in {:?} mode", config.environment);

    let pool = pool::connect(&config.database).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let roles = Arc::new(IdentityClient::new(&config.identity));
    let port = config.server.port;
    let state = AppState {
        config: Arc::new(config),
        pool,
        roles,
    };

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
