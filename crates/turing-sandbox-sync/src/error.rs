//! Error types for session replication.

use thiserror::Error;
use turing_sandbox_core::GraphError;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors raised by the replication layer.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An incoming message could not be decoded or failed validation.
    #[error("malformed message: {message}")]
    Decode { message: String },

    /// Encoding an outgoing message failed.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The transport could not deliver a message.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The transport has shut down.
    #[error("transport closed")]
    Closed,

    /// Only the session authority may do this.
    #[error("operation requires the session authority")]
    NotAuthority,

    /// Starting needs more players.
    #[error("at least {required} players are required to start, have {count}")]
    NotEnoughPlayers { count: usize, required: usize },

    /// Configuration cannot change once the session started.
    #[error("session already started")]
    AlreadyStarted,

    /// Outgoing chat exceeds the message limit.
    #[error("chat message has {len} characters, limit is {max}")]
    ChatTooLong { len: usize, max: usize },

    /// The session is over for this participant.
    #[error("session has ended")]
    SessionEnded,

    /// A local edit was invalid.
    #[error(transparent)]
    Graph(#[from] GraphError),
}
