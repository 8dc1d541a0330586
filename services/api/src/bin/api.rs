//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DeepSeekClient, FileExporter, SqliteStore},
    config::Config,
    error::ApiError,
    web::{chat_handler, clear_history_handler, AppState},
};
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::post,
    Router,
};
use reading_coach_core::{ChatOrchestrator, ContentStore};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // Fail fast before any network call can happen with an empty credential.
    let api_key = config.require_api_key()?.to_string();

    // --- 2. Connect to Database & Create Schema ---
    info!("Connecting to database...");
    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = Arc::new(SqliteStore::new(db_pool));
    store.init_schema().await?;
    info!("Database schema ready.");

    // Retention sweep on startup, mirroring the reference deployment.
    store
        .prune_older_than(config.generation.retention_days)
        .await?;

    // --- 3. Initialize Service Adapters ---
    let client = Arc::new(
        DeepSeekClient::new(
            config.api_base.clone(),
            api_key,
            config.generation_model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
        .map_err(|e| ApiError::Internal(format!("building HTTP client: {}", e)))?,
    );
    let exporter = Arc::new(FileExporter::new(config.export_dir.clone()));

    // --- 4. Build the Shared AppState ---
    let chat = ChatOrchestrator::new(
        store.clone(),
        client,
        exporter,
        config.generation.clone(),
    );
    let app_state = Arc::new(AppState {
        store,
        chat,
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    // --- 5. Create the Web Router ---
    let app = Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/clear_history", post(clear_history_handler))
        .layer(cors)
        .with_state(app_state);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
