//! Relay state and response types.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::debug;
use turing_sandbox_sync::{SessionCode, SessionMessage};

/// Buffered messages per session channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Shared state of the relay: one broadcast channel per active session.
///
/// The relay does not interpret messages beyond routing them; authority and
/// ordering are the participants' business.
#[derive(Debug)]
pub struct RelayState {
    channels: RwLock<HashMap<SessionCode, broadcast::Sender<SessionMessage>>>,
    capacity: usize,
}

impl Default for RelayState {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl RelayState {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to a session, creating its channel on first use.
    pub async fn subscribe(&self, code: &SessionCode) -> broadcast::Receiver<SessionMessage> {
        let mut channels = self.channels.write().await;
        channels
            .entry(code.clone())
            .or_insert_with(|| {
                debug!(session = %code, "relay_session_opened");
                broadcast::channel(self.capacity).0
            })
            .subscribe()
    }

    /// Deliver to every subscriber of the message's session. Returns how
    /// many subscribers it reached.
    pub async fn publish(&self, message: SessionMessage) -> usize {
        let channels = self.channels.read().await;
        match channels.get(&message.session) {
            Some(sender) => sender.send(message).unwrap_or(0),
            None => 0,
        }
    }

    /// Drop the session's channel once nobody listens.
    pub async fn prune(&self, code: &SessionCode) {
        let mut channels = self.channels.write().await;
        if channels.get(code).is_some_and(|s| s.receiver_count() == 0) {
            channels.remove(code);
            debug!(session = %code, "relay_session_closed");
        }
    }

    /// Active sessions, sorted by code.
    pub async fn sessions(&self) -> Vec<SessionInfo> {
        let channels = self.channels.read().await;
        let mut sessions: Vec<SessionInfo> = channels
            .iter()
            .map(|(code, sender)| SessionInfo {
                code: code.clone(),
                subscribers: sender.receiver_count(),
            })
            .collect();
        sessions.sort_by(|a, b| a.code.cmp(&b.code));
        sessions
    }

    pub async fn session_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

/// Response wrapper with timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self { data, timestamp }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Sessions with at least one connected client.
    pub sessions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub code: SessionCode,
    pub subscribers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use turing_sandbox_sync::{ParticipantId, Payload};

    fn chat(session: &str) -> SessionMessage {
        SessionMessage::new(
            SessionCode::new(session),
            ParticipantId::new("ada"),
            Payload::ChatMessage {
                message: "hi".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_publish_reaches_only_its_session() {
        let state = RelayState::default();
        let mut a1 = state.subscribe(&SessionCode::new("A")).await;
        let mut a2 = state.subscribe(&SessionCode::new("A")).await;
        let mut b = state.subscribe(&SessionCode::new("B")).await;

        assert_eq!(state.publish(chat("A")).await, 2);
        assert_eq!(a1.recv().await.unwrap(), chat("A"));
        assert_eq!(a2.recv().await.unwrap(), chat("A"));
        assert!(b.try_recv().is_err());

        assert_eq!(state.publish(chat("nobody")).await, 0);
    }

    #[tokio::test]
    async fn test_prune_removes_idle_sessions() {
        let state = RelayState::default();
        let code = SessionCode::new("A");
        let rx = state.subscribe(&code).await;
        state.prune(&code).await;
        assert_eq!(state.session_count().await, 1);

        drop(rx);
        state.prune(&code).await;
        assert_eq!(state.session_count().await, 0);
    }
}
