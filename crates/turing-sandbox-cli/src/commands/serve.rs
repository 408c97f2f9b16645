//! Host the session relay.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use turing_sandbox_api::{create_app, create_relay_state};

pub async fn execute(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!();
    println!("Turing Sandbox relay");
    println!("   API: http://localhost:{}/api/health", port);
    println!("   WS:  ws://localhost:{}/api/ws/<session>", port);
    println!();
    println!("   Press Ctrl+C to stop");
    println!();

    info!(%addr, "relay_listening");
    axum::serve(listener, create_app(create_relay_state())).await?;
    Ok(())
}
