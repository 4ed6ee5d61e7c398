use std::sync::Arc;
use std::time::Duration;

use doodle_service::{http::build_router, service::GeminiRecognizer, state::AppState};
use shared::{AuthConfig, DatabaseConfig, RecognitionConfig, ServiceConfig};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    shared::init_tracing("doodle-service")?;

    let db_config = DatabaseConfig::from_env()?;
    let service_config = ServiceConfig::from_env(8000)?;
    let auth_config = AuthConfig::from_env()?;
    let recognition_config = RecognitionConfig::from_env()?;

    shared::init_metrics(service_config.metrics_port)?;

    tracing::info!("Doodle Service starting...");

    tracing::info!(
        port = service_config.port,
        max_connections = db_config.max_connections,
        leaderboard_size = service_config.leaderboard_size,
        token_ttl_minutes = auth_config.token_ttl_minutes,
        recognition_model = %recognition_config.model,
        "Configuration loaded"
    );

    tracing::info!("Connecting to PostgreSQL...");
    let db_pool = PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .acquire_timeout(Duration::from_secs(db_config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&db_config.url)
        .await?;

    tracing::info!("Connected to PostgreSQL successfully");

    if service_config.run_migrations {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    } else {
        tracing::info!("Skipping migrations (RUN_MIGRATIONS=false)");
    }

    let recognizer = Arc::new(GeminiRecognizer::new(recognition_config)?);
    let state = AppState::new(
        db_pool,
        auth_config,
        service_config.leaderboard_size,
        recognizer,
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", service_config.port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Doodle Service stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
