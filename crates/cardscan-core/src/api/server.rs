//! API server setup.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::error::CardscanError;
use crate::models::config::{CardscanConfig, ServerConfig};
use crate::ocr::OcrEngine;
use crate::store::CardStore;

use super::{
    handlers::{UPLOADS_PREFIX, health_handler, list_cards_handler, upload_handler},
    types::ApiState,
};

// Multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        if !server.cors_origins.is_empty() {
            warn!("cors_origins set but none are valid - falling back to permissive CORS");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        info!("CORS configured with {} allowed origin(s)", origins.len());
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Create the API router.
///
/// Uploaded images are written to and served from `storage.upload_dir`.
pub fn create_router(state: ApiState) -> Router {
    let body_limit = state.config.server.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    let uploads = ServeDir::new(&state.config.storage.upload_dir);
    let cors = cors_layer(&state.config.server);

    Router::new()
        .route("/upload", post(upload_handler))
        .route("/cards", get(list_cards_handler))
        .route("/health", get(health_handler))
        .nest_service(UPLOADS_PREFIX, uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server and run until Ctrl-C.
pub async fn serve(
    config: CardscanConfig,
    engine: Arc<dyn OcrEngine>,
    store: Arc<dyn CardStore>,
) -> Result<(), CardscanError> {
    tokio::fs::create_dir_all(&config.storage.upload_dir).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let upload_dir = config.storage.upload_dir.clone();
    let app = create_router(ApiState::new(config, engine, store));

    let listener = TcpListener::bind(&addr).await?;
    info!(
        "Server running on {} (uploads in {})",
        listener.local_addr()?,
        upload_dir.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
