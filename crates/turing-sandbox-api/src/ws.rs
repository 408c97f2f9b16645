//! WebSocket endpoint relaying session messages.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
};
use tokio::sync::broadcast;
use tracing::{debug, error, warn};
use turing_sandbox_sync::{SessionCode, SessionMessage};

use crate::types::RelayState;

/// Handler for WebSocket upgrade at GET /api/ws/{code}
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(code): Path<String>,
    State(state): State<Arc<RelayState>>,
) -> Response {
    let code = SessionCode::new(code);
    ws.on_upgrade(move |socket| handle_socket(socket, state, code))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<RelayState>, code: SessionCode) {
    debug!(session = %code, "relay_client_connected");
    let mut rx = state.subscribe(&code).await;

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        relay_frame(&state, &code, text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(session = %code, "relay_client_disconnected");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary, ping and pong frames carry nothing to relay
                    }
                    Some(Err(e)) => {
                        error!(session = %code, error = %e, "relay_socket_error");
                        break;
                    }
                }
            }

            msg = rx.recv() => {
                match msg {
                    Ok(message) => {
                        if let Err(e) = send_message(&mut socket, &message).await {
                            error!(session = %code, error = %e, "relay_send_failed");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(session = %code, missed = n, "relay_client_lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    drop(rx);
    state.prune(&code).await;
}

/// Decode a client frame and publish it to the session. Malformed frames and
/// frames addressed to another session are dropped. Returns the number of
/// subscribers reached.
pub(crate) async fn relay_frame(state: &RelayState, code: &SessionCode, text: &str) -> usize {
    let message = match SessionMessage::decode(text) {
        Ok(message) => message,
        Err(e) => {
            warn!(session = %code, error = %e, "relay_dropped_malformed_frame");
            return 0;
        }
    };
    if message.session != *code {
        warn!(session = %code, claimed = %message.session, "relay_dropped_foreign_frame");
        return 0;
    }
    state.publish(message).await
}

async fn send_message(
    socket: &mut WebSocket,
    message: &SessionMessage,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let json = message.encode()?;
    socket.send(Message::Text(json.into())).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use turing_sandbox_sync::{ParticipantId, Payload};

    #[tokio::test]
    async fn test_relay_frame_filters() {
        let state = RelayState::default();
        let code = SessionCode::new("ROOM");
        let mut rx = state.subscribe(&code).await;

        assert_eq!(relay_frame(&state, &code, "not json").await, 0);

        let foreign = SessionMessage::new(
            SessionCode::new("OTHER"),
            ParticipantId::new("ada"),
            Payload::LobbyStarted,
        );
        assert_eq!(relay_frame(&state, &code, &foreign.encode().unwrap()).await, 0);

        let ok = SessionMessage::new(code.clone(), ParticipantId::new("ada"), Payload::LobbyStarted);
        assert_eq!(relay_frame(&state, &code, &ok.encode().unwrap()).await, 1);
        assert_eq!(rx.recv().await.unwrap(), ok);
    }
}
