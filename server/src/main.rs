use anyhow::Context;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use clubhouse_config::load as load_config;
use clubhouse_database::{initialize_database, DatabaseConnection};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(env_filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("starting Clubhouse backend");

    let config = load_config().context("failed to load configuration")?;

    let pool = initialize_database(&config.database)
        .await
        .context("failed to initialise database")?;
    let database = DatabaseConnection::from_pool(pool);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(database);

    let addr = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn health(
    State(database): State<DatabaseConnection>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    database
        .test_connection()
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "app": "clubhouse"
    })))
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_err() {
        return;
    }
    info!("shutdown signal received");
}
