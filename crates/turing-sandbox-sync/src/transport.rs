//! Transport seam between the coordinator and whatever carries messages.
//!
//! Publishing is fire-and-forget and receiving never blocks, so the
//! coordinator can be driven from a frame loop or a test without an async
//! runtime.

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{trace, warn};

use crate::error::{SyncError, SyncResult};
use crate::message::SessionMessage;

/// Default buffered messages per hub.
pub const DEFAULT_HUB_CAPACITY: usize = 256;

/// Outgoing side: deliver a message to every participant of its session.
pub trait Transport {
    fn publish(&self, message: SessionMessage) -> SyncResult<()>;
}

/// Incoming side: the next pending message, if any.
pub trait Inbox {
    fn try_next(&mut self) -> SyncResult<Option<SessionMessage>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn publish(&self, message: SessionMessage) -> SyncResult<()> {
        (**self).publish(message)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn publish(&self, message: SessionMessage) -> SyncResult<()> {
        (**self).publish(message)
    }
}

/// In-process fan-out. Every endpoint, the sender's own included, receives
/// every message in publication order.
#[derive(Debug, Clone)]
pub struct LocalHub {
    sender: broadcast::Sender<SessionMessage>,
}

impl Default for LocalHub {
    fn default() -> Self {
        Self::new(DEFAULT_HUB_CAPACITY)
    }
}

impl LocalHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Connect a participant. Only messages published after this call are
    /// delivered to the returned inbox.
    pub fn connect(&self) -> (HubPublisher, HubInbox) {
        (
            HubPublisher {
                sender: self.sender.clone(),
            },
            HubInbox {
                receiver: self.sender.subscribe(),
            },
        )
    }

    /// Connected inboxes.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Publishing half of a hub connection.
#[derive(Debug, Clone)]
pub struct HubPublisher {
    sender: broadcast::Sender<SessionMessage>,
}

impl Transport for HubPublisher {
    fn publish(&self, message: SessionMessage) -> SyncResult<()> {
        trace!(kind = message.payload.kind(), sender = %message.sender, "hub_publish");
        self.sender
            .send(message)
            .map(|_| ())
            .map_err(|_| SyncError::Transport {
                message: "no connected receivers".to_string(),
            })
    }
}

/// Receiving half of a hub connection.
#[derive(Debug)]
pub struct HubInbox {
    receiver: broadcast::Receiver<SessionMessage>,
}

impl Inbox for HubInbox {
    fn try_next(&mut self) -> SyncResult<Option<SessionMessage>> {
        loop {
            match self.receiver.try_recv() {
                Ok(message) => return Ok(Some(message)),
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "hub_inbox_lagged");
                }
                Err(TryRecvError::Closed) => return Err(SyncError::Closed),
            }
        }
    }
}
