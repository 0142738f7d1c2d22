//! Router setup with all API routes and middleware.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use buddhi_core::config::BuddhiConfig;
use buddhi_core::error::BuddhiError;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
///
/// Both the bare (`/`, `/feedback`) and prefixed (`/api/`, `/api/feedback`)
/// route sets are served.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::root).post(handlers::ask))
        .route("/health", get(handlers::health))
        .route("/feedback", post(handlers::feedback))
        .route("/api/", post(handlers::ask))
        .route("/api/feedback", post(handlers::feedback))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind the configured host and port and serve until the process exits.
pub async fn start_server(config: &BuddhiConfig, state: AppState) -> Result<(), BuddhiError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BuddhiError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| BuddhiError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
