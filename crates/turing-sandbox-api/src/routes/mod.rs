//! Relay route handlers.

mod health;
mod sessions;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::types::RelayState;
use crate::ws::ws_handler;

/// Relay endpoints, to be mounted under `/api`.
pub fn create_relay_router(state: Arc<RelayState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/sessions", get(sessions::sessions_handler))
        .route("/ws/{code}", get(ws_handler))
        // Request tracing (enable with RUST_LOG=tower_http=info or higher)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// The whole relay application.
pub fn create_app(state: Arc<RelayState>) -> Router {
    Router::new().nest("/api", create_relay_router(state))
}
