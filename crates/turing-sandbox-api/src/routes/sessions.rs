use std::sync::Arc;

use axum::{extract::State, Json};

use crate::types::{ApiResponse, RelayState, SessionInfo};

/// Handler for GET /api/sessions
pub async fn sessions_handler(State(state): State<Arc<RelayState>>) -> Json<ApiResponse<Vec<SessionInfo>>> {
    Json(ApiResponse::new(state.sessions().await))
}
