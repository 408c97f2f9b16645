//! Health check endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::types::{ApiResponse, HealthResponse, RelayState};

/// Handler for GET /api/health
pub async fn health_handler(State(state): State<Arc<RelayState>>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::new(HealthResponse {
        status: "ok".to_string(),
        sessions: state.session_count().await,
    }))
}
