//! WebSocket relay for collaborative Turing Sandbox sessions.
//!
//! The relay forwards [`SessionMessage`](turing_sandbox_sync::SessionMessage)s
//! between the participants of a session. It holds no graph and makes no
//! authority decisions.
//!
//! ## Endpoints
//!
//! - `GET /api/health` - Health check with the number of open sessions
//! - `GET /api/sessions` - Open sessions with subscriber counts
//! - `GET /api/ws/{code}` - WebSocket joined to session `code`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use turing_sandbox_api::{create_app, create_relay_state};
//!
//! # async fn run() -> std::io::Result<()> {
//! let app = create_app(create_relay_state());
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:7878").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

mod routes;
mod types;
mod ws;

pub use routes::{create_app, create_relay_router};
pub use types::{ApiResponse, HealthResponse, RelayState, SessionInfo, DEFAULT_CHANNEL_CAPACITY};

use std::sync::Arc;

/// Fresh relay state with the default channel capacity.
pub fn create_relay_state() -> Arc<RelayState> {
    Arc::new(RelayState::default())
}
