//! Quizcraft API server entry point.

use std::sync::{Arc, Mutex};

use quizcraft_api::achievements::LoggingAchievements;
use quizcraft_api::config::{AppConfig, LogFormat};
use quizcraft_api::error::AppError;
use quizcraft_api::state::AppState;
use quizcraft_core::clock::SystemClock;
use quizcraft_core::rng::{DeterministicRng, SystemRng};
use quizcraft_core::store::KeyValueStore;
use quizcraft_store::{MemoryStore, PgStore};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

async fn connect_store(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>, AppError> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, using the in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await?;
    let store = PgStore::new(pool);
    store.migrate().await.map_err(AppError::Migration)?;
    tracing::info!("connected to PostgreSQL and applied migrations");
    Ok(Arc::new(store))
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // A missing .env file is fine; the environment may already be set.
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    init_tracing(config.log_format);
    tracing::info!("Starting Quizcraft API server");

    let store = connect_store(&config).await?;
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
        Arc::new(Mutex::new(SystemRng::from_entropy()));
    let app_state = AppState::new(
        store,
        Arc::new(SystemClock),
        rng,
        Arc::new(LoggingAchievements),
    );
    let app = quizcraft_api::app(app_state);

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
