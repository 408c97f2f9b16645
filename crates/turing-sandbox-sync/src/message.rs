//! Session-scoped replication messages and their JSON codec.

use std::fmt;

use serde::{Deserialize, Serialize};
use turing_sandbox_core::{DeleteTarget, EditCommand, GraphSnapshot, Position, StateId, TransitionDraft};

use crate::error::{SyncError, SyncResult};

/// Longest chat message accepted at decode time, in characters.
pub const MAX_CHAT_LEN: usize = 500;

/// Code identifying one collaborative session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionCode(pub String);

impl SessionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A participant's display name, unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Message body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    /// Follower asks the authority to add a state.
    ProposeAddState {
        position: Position,
        #[serde(rename = "isEnd", default)]
        is_end: bool,
    },
    /// Follower asks the authority to add a transition.
    ProposeAddTransition { draft: TransitionDraft },
    /// Follower asks the authority to delete a state or transition.
    ProposeDelete { target: DeleteTarget },
    /// Follower asks the authority to move the start flag.
    ProposeSetStart { id: StateId },
    /// Follower asks the authority to clear the canvas.
    ProposeClear,
    /// Authoritative full graph after the authority handled something.
    EnvironmentSynced { revision: u64, snapshot: GraphSnapshot },
    PlayerJoined { player: ParticipantId },
    PlayerLeft { player: ParticipantId },
    PlayerKicked { player: ParticipantId },
    LobbyStarted,
    LobbyDeleted,
    ChatMessage { message: String },
}

impl Payload {
    /// Proposal carrying `command`.
    pub fn proposal(command: EditCommand) -> Self {
        match command {
            EditCommand::AddState { position, is_end } => Payload::ProposeAddState { position, is_end },
            EditCommand::AddTransition { draft } => Payload::ProposeAddTransition { draft },
            EditCommand::Delete { target } => Payload::ProposeDelete { target },
            EditCommand::SetStart { id } => Payload::ProposeSetStart { id },
            EditCommand::Clear => Payload::ProposeClear,
        }
    }

    /// The edit a proposal carries; `None` for every other payload.
    pub fn into_command(self) -> Option<EditCommand> {
        match self {
            Payload::ProposeAddState { position, is_end } => Some(EditCommand::AddState { position, is_end }),
            Payload::ProposeAddTransition { draft } => Some(EditCommand::AddTransition { draft }),
            Payload::ProposeDelete { target } => Some(EditCommand::Delete { target }),
            Payload::ProposeSetStart { id } => Some(EditCommand::SetStart { id }),
            Payload::ProposeClear => Some(EditCommand::Clear),
            _ => None,
        }
    }

    pub fn is_proposal(&self) -> bool {
        matches!(
            self,
            Payload::ProposeAddState { .. }
                | Payload::ProposeAddTransition { .. }
                | Payload::ProposeDelete { .. }
                | Payload::ProposeSetStart { .. }
                | Payload::ProposeClear
        )
    }

    /// Tag name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::ProposeAddState { .. } => "propose_add_state",
            Payload::ProposeAddTransition { .. } => "propose_add_transition",
            Payload::ProposeDelete { .. } => "propose_delete",
            Payload::ProposeSetStart { .. } => "propose_set_start",
            Payload::ProposeClear => "propose_clear",
            Payload::EnvironmentSynced { .. } => "environment_synced",
            Payload::PlayerJoined { .. } => "player_joined",
            Payload::PlayerLeft { .. } => "player_left",
            Payload::PlayerKicked { .. } => "player_kicked",
            Payload::LobbyStarted => "lobby_started",
            Payload::LobbyDeleted => "lobby_deleted",
            Payload::ChatMessage { .. } => "chat_message",
        }
    }
}

/// A message on a session channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMessage {
    pub session: SessionCode,
    pub sender: ParticipantId,
    pub payload: Payload,
}

impl SessionMessage {
    pub fn new(session: SessionCode, sender: ParticipantId, payload: Payload) -> Self {
        Self {
            session,
            sender,
            payload,
        }
    }

    /// Encode as JSON.
    pub fn encode(&self) -> SyncResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode and validate a JSON message.
    pub fn decode(raw: &str) -> SyncResult<Self> {
        let message: SessionMessage = serde_json::from_str(raw).map_err(|e| SyncError::Decode {
            message: e.to_string(),
        })?;
        message.validate()?;
        Ok(message)
    }

    fn validate(&self) -> SyncResult<()> {
        let reject = |message: &str| {
            Err(SyncError::Decode {
                message: message.to_string(),
            })
        };
        if self.session.as_str().trim().is_empty() {
            return reject("empty session code");
        }
        if self.sender.as_str().trim().is_empty() {
            return reject("empty sender");
        }
        match &self.payload {
            Payload::ChatMessage { message } if message.chars().count() > MAX_CHAT_LEN => {
                reject("chat message too long")
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turing_sandbox_core::{Move, Symbol};

    fn msg(payload: Payload) -> SessionMessage {
        SessionMessage::new(SessionCode::new("ABCD"), ParticipantId::new("ada"), payload)
    }

    #[test]
    fn test_payload_tagged_json() {
        let json = msg(Payload::ProposeAddState {
            position: Position::new(130.0, 0.0),
            is_end: true,
        })
        .encode()
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["payload"]["type"], "propose_add_state");
        assert_eq!(value["payload"]["isEnd"], true);
        assert_eq!(value["session"], "ABCD");
    }

    #[test]
    fn test_decode_round_trip() {
        let draft = TransitionDraft::between(StateId(0), StateId(1)).tape1([Symbol('1')], None, Move::Right);
        let original = msg(Payload::ProposeAddTransition { draft });
        let decoded = SessionMessage::decode(&original.encode().unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(matches!(
            SessionMessage::decode("{\"session\":\"A\""),
            Err(SyncError::Decode { .. })
        ));
        assert!(SessionMessage::decode(
            r#"{"session":"A","sender":"b","payload":{"type":"teleport"}}"#
        )
        .is_err());
        assert!(SessionMessage::decode(
            r#"{"session":" ","sender":"b","payload":{"type":"lobby_started"}}"#
        )
        .is_err());
    }

    #[test]
    fn test_decode_rejects_oversized_chat() {
        let long = "x".repeat(MAX_CHAT_LEN + 1);
        let raw = msg(Payload::ChatMessage { message: long }).encode().unwrap();
        assert!(SessionMessage::decode(&raw).is_err());
    }

    #[test]
    fn test_proposal_command_round_trip() {
        let command = EditCommand::Delete {
            target: DeleteTarget::State { id: StateId(3) },
        };
        let payload = Payload::proposal(command.clone());
        assert!(payload.is_proposal());
        assert_eq!(payload.into_command(), Some(command));
        assert_eq!(Payload::LobbyStarted.into_command(), None);
    }
}
