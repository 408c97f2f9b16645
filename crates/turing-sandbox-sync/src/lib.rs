//! Host-authoritative replication for collaborative machine editing.
//!
//! A session shares one [`AutomatonGraph`](turing_sandbox_core::AutomatonGraph)
//! between participants. The [`Coordinator`] holds one participant's view;
//! [`SessionMessage`] is the wire vocabulary; [`Transport`] and [`Inbox`] are
//! the seams to whatever carries the messages ([`LocalHub`] in-process, the
//! relay service over WebSockets).

pub mod coordinator;
pub mod error;
pub mod lobby;
pub mod message;
pub mod oplog;
pub mod transport;

pub use coordinator::{Coordinator, EndReason, Notice, Role, SessionStatus};
pub use error::{SyncError, SyncResult};
pub use lobby::{ChatEntry, ChatLog, Lobby, MAX_CHAT_MESSAGES, MIN_PLAYERS_TO_START};
pub use message::{ParticipantId, Payload, SessionCode, SessionMessage, MAX_CHAT_LEN};
pub use oplog::{LoggedEdit, OpLog};
pub use transport::{HubInbox, HubPublisher, Inbox, LocalHub, Transport, DEFAULT_HUB_CAPACITY};
