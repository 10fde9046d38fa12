use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attendance::api::router;
use attendance::clock::SystemClock;
use attendance::config::Config;
use attendance::db;
use attendance::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "attendance=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::connect(&config.database_url, config.max_connections).await?;

    let clock = Arc::new(SystemClock);

    if config.seed_sample_data {
        db::seed_sample_students(&pool, clock.as_ref()).await?;
    }

    let state = AppState {
        db: pool.clone(),
        clock,
    };

    let app = router(state);

    info!("Starting attendance service on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
