//! Host-authoritative replication of one automaton graph.
//!
//! Exactly one participant per session is the authority. It owns the
//! canonical graph, applies edits (its own and followers' proposals) one at a
//! time in receipt order, and after every proposal broadcasts the full graph
//! with a fresh revision number. Followers never edit their copy directly;
//! they publish proposals and replace their graph wholesale from snapshots.
//!
//! The coordinator does no I/O of its own. Outgoing messages go through a
//! [`Transport`]; incoming ones are fed to [`Coordinator::handle`] or drained
//! from an [`Inbox`] with [`Coordinator::poll`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use turing_sandbox_core::{AutomatonGraph, EditCommand, EditOutcome};

use crate::error::{SyncError, SyncResult};
use crate::lobby::{ChatLog, Lobby, MIN_PLAYERS_TO_START};
use crate::message::{ParticipantId, Payload, SessionCode, SessionMessage, MAX_CHAT_LEN};
use crate::oplog::OpLog;
use crate::transport::{Inbox, Transport};

/// Revision of the authority's first snapshot. Followers start at 0 so that
/// the first snapshot they see is always newer.
const FIRST_REVISION: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Authority,
    Follower,
}

/// Why a session ended for this participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    AuthorityLeft,
    LobbyDeleted,
    Kicked,
    /// This participant left.
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Lobby,
    Started,
    Ended(EndReason),
}

impl SessionStatus {
    pub fn is_ended(&self) -> bool {
        matches!(self, SessionStatus::Ended(_))
    }
}

/// Something the local user should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    PlayerJoined(ParticipantId),
    PlayerLeft(ParticipantId),
    PlayerKicked(ParticipantId),
    Started,
    Ended(EndReason),
    /// The authority rejected a proposal.
    ProposalDropped { from: ParticipantId, reason: String },
    /// An outgoing message could not be delivered. Not retried.
    PublishFailed(String),
}

/// One participant's view of a session.
#[derive(Debug)]
pub struct Coordinator<T> {
    session: SessionCode,
    me: ParticipantId,
    role: Role,
    graph: AutomatonGraph,
    revision: u64,
    lobby: Lobby,
    status: SessionStatus,
    chat: ChatLog,
    oplog: OpLog,
    notices: Vec<Notice>,
    transport: T,
}

impl<T: Transport> Coordinator<T> {
    /// Host a session around `graph`.
    pub fn authority(session: SessionCode, me: ParticipantId, graph: AutomatonGraph, transport: T) -> Self {
        info!(session = %session, participant = %me, "coordinator_hosting");
        Self {
            oplog: OpLog::new(&graph),
            lobby: Lobby::new(me.clone()),
            session,
            me,
            role: Role::Authority,
            graph,
            revision: FIRST_REVISION,
            status: SessionStatus::Lobby,
            chat: ChatLog::default(),
            notices: Vec::new(),
            transport,
        }
    }

    /// Join a session hosted by `authority`. The local graph stays empty
    /// until the first snapshot arrives.
    pub fn follower(session: SessionCode, me: ParticipantId, authority: ParticipantId, transport: T) -> Self {
        info!(session = %session, participant = %me, authority = %authority, "coordinator_joining");
        let graph = AutomatonGraph::default();
        let mut lobby = Lobby::new(authority);
        lobby.join(me.clone());
        Self {
            oplog: OpLog::new(&graph),
            lobby,
            session,
            me,
            role: Role::Follower,
            graph,
            revision: 0,
            status: SessionStatus::Lobby,
            chat: ChatLog::default(),
            notices: Vec::new(),
            transport,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn session(&self) -> &SessionCode {
        &self.session
    }

    pub fn me(&self) -> &ParticipantId {
        &self.me
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_authority(&self) -> bool {
        self.role == Role::Authority
    }

    pub fn authority_id(&self) -> &ParticipantId {
        self.lobby.host()
    }

    /// Local copy of the graph. Read-only: edits go through [`Self::submit`].
    pub fn graph(&self) -> &AutomatonGraph {
        &self.graph
    }

    /// Revision of the graph held locally. 0 until a follower has synced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    /// Edits accepted by this participant as authority.
    pub fn oplog(&self) -> &OpLog {
        &self.oplog
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Take the notices gathered since the last call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // -------------------------------------------------------------------------
    // Local actions
    // -------------------------------------------------------------------------

    /// Tell the session this participant is here. The authority answers a
    /// join with a snapshot, so a follower converges right after announcing.
    pub fn announce(&mut self) {
        match self.role {
            Role::Authority => self.broadcast_snapshot(),
            Role::Follower => self.publish(Payload::PlayerJoined {
                player: self.me.clone(),
            }),
        }
    }

    /// Perform an edit.
    ///
    /// The authority applies it and broadcasts the result, returning the
    /// outcome; an invalid edit is returned as an error and nothing is sent.
    /// A follower only publishes a proposal and returns `None`; its graph
    /// changes once the authority's snapshot arrives.
    pub fn submit(&mut self, command: EditCommand) -> SyncResult<Option<EditOutcome>> {
        self.ensure_active()?;
        match self.role {
            Role::Authority => {
                let author = self.me.clone();
                let outcome = self.graph.apply(command.clone())?;
                self.revision += 1;
                self.oplog.record(self.revision, author, command);
                self.broadcast_snapshot();
                Ok(Some(outcome))
            }
            Role::Follower => {
                debug!(session = %self.session, op = command.name(), "coordinator_propose");
                self.publish(Payload::proposal(command));
                Ok(None)
            }
        }
    }

    /// Lock configuration and tell everyone the session began.
    pub fn start(&mut self) -> SyncResult<()> {
        self.ensure_authority()?;
        if self.lobby.is_started() {
            return Err(SyncError::AlreadyStarted);
        }
        if !self.lobby.can_start() {
            return Err(SyncError::NotEnoughPlayers {
                count: self.lobby.len(),
                required: MIN_PLAYERS_TO_START,
            });
        }
        self.lobby.mark_started();
        self.status = SessionStatus::Started;
        info!(session = %self.session, players = self.lobby.len(), "coordinator_started");
        self.publish(Payload::LobbyStarted);
        Ok(())
    }

    /// Switch between single- and dual-tape mode before the session starts.
    ///
    /// The operation log is rebased on the new graph, since tape mode is not
    /// an edit command.
    pub fn set_tape_mode(&mut self, dual_tape: bool) -> SyncResult<()> {
        self.ensure_authority()?;
        if self.lobby.is_started() {
            return Err(SyncError::AlreadyStarted);
        }
        if self.graph.is_dual_tape() == dual_tape {
            return Ok(());
        }
        self.graph.set_dual_tape(dual_tape);
        self.oplog = OpLog::new(&self.graph);
        self.revision += 1;
        self.broadcast_snapshot();
        Ok(())
    }

    /// Remove a player from the session.
    pub fn kick(&mut self, player: &ParticipantId) -> SyncResult<()> {
        self.ensure_authority()?;
        if *player == self.me {
            return Ok(());
        }
        self.lobby.leave(player);
        info!(session = %self.session, player = %player, "coordinator_kick");
        self.publish(Payload::PlayerKicked {
            player: player.clone(),
        });
        Ok(())
    }

    /// Leave the session. An authority leaving deletes the lobby.
    pub fn leave(&mut self) {
        if self.status.is_ended() {
            return;
        }
        let payload = match self.role {
            Role::Authority => Payload::LobbyDeleted,
            Role::Follower => Payload::PlayerLeft {
                player: self.me.clone(),
            },
        };
        self.publish(payload);
        self.end(EndReason::Left);
    }

    /// Post a chat message. Own messages are logged locally right away.
    pub fn send_chat(&mut self, message: impl Into<String>) -> SyncResult<()> {
        self.ensure_active()?;
        let message = message.into();
        let len = message.chars().count();
        if len > MAX_CHAT_LEN {
            return Err(SyncError::ChatTooLong {
                len,
                max: MAX_CHAT_LEN,
            });
        }
        self.chat.push(self.me.clone(), message.clone());
        self.publish(Payload::ChatMessage { message });
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Incoming messages
    // -------------------------------------------------------------------------

    /// Drain every pending message from `inbox`. Returns how many were read.
    pub fn poll(&mut self, inbox: &mut impl Inbox) -> SyncResult<usize> {
        let mut count = 0;
        while let Some(message) = inbox.try_next()? {
            self.handle(message);
            count += 1;
        }
        Ok(count)
    }

    /// Process one incoming message.
    pub fn handle(&mut self, message: SessionMessage) {
        if message.session != self.session {
            debug!(expected = %self.session, got = %message.session, "coordinator_foreign_session");
            return;
        }
        if self.status.is_ended() || message.sender == self.me {
            return;
        }

        let SessionMessage { sender, payload, .. } = message;
        let from_authority = sender == *self.lobby.host();
        match payload {
            Payload::EnvironmentSynced { revision, snapshot } => {
                if self.is_authority() || !from_authority {
                    return;
                }
                if revision <= self.revision {
                    debug!(revision, current = self.revision, "coordinator_stale_snapshot");
                    return;
                }
                self.graph = AutomatonGraph::from_snapshot(&snapshot);
                self.revision = revision;
                debug!(
                    revision,
                    states = self.graph.state_count(),
                    transitions = self.graph.transition_count(),
                    "coordinator_synced"
                );
            }
            Payload::PlayerJoined { player } => {
                if self.lobby.join(player.clone()) {
                    info!(session = %self.session, player = %player, "coordinator_player_joined");
                    self.notices.push(Notice::PlayerJoined(player));
                }
                if self.is_authority() {
                    self.broadcast_snapshot();
                }
            }
            // Only a participant can announce its own departure.
            Payload::PlayerLeft { player } if player == sender => {
                if player == *self.lobby.host() {
                    self.end(EndReason::AuthorityLeft);
                } else if self.lobby.leave(&player) {
                    self.notices.push(Notice::PlayerLeft(player));
                }
            }
            Payload::PlayerKicked { player } if from_authority => {
                if player == self.me {
                    self.end(EndReason::Kicked);
                } else if self.lobby.leave(&player) {
                    self.notices.push(Notice::PlayerKicked(player));
                }
            }
            Payload::LobbyStarted if from_authority => {
                self.lobby.mark_started();
                self.status = SessionStatus::Started;
                self.notices.push(Notice::Started);
            }
            Payload::LobbyDeleted if from_authority => self.end(EndReason::LobbyDeleted),
            Payload::ChatMessage { message } => self.chat.push(sender, message),
            payload if payload.is_proposal() => {
                if self.is_authority() {
                    if let Some(command) = payload.into_command() {
                        self.apply_proposal(sender, command);
                    }
                }
            }
            other => {
                warn!(kind = other.kind(), sender = %sender, "coordinator_unauthorized_message");
            }
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Apply one proposal and broadcast, whether or not it was valid.
    fn apply_proposal(&mut self, from: ParticipantId, command: EditCommand) {
        let op = command.name();
        match self.graph.apply(command.clone()) {
            Ok(_) => {
                self.revision += 1;
                self.oplog.record(self.revision, from, command);
                debug!(op, revision = self.revision, "coordinator_proposal_applied");
            }
            Err(e) => {
                self.revision += 1;
                warn!(op, from = %from, error = %e, "coordinator_proposal_dropped");
                self.notices.push(Notice::ProposalDropped {
                    from,
                    reason: e.to_string(),
                });
            }
        }
        self.broadcast_snapshot();
    }

    fn broadcast_snapshot(&mut self) {
        let payload = Payload::EnvironmentSynced {
            revision: self.revision,
            snapshot: self.graph.snapshot(),
        };
        self.publish(payload);
    }

    fn publish(&mut self, payload: Payload) {
        let kind = payload.kind();
        let message = SessionMessage::new(self.session.clone(), self.me.clone(), payload);
        if let Err(e) = self.transport.publish(message) {
            warn!(session = %self.session, kind, error = %e, "coordinator_publish_failed");
            self.notices.push(Notice::PublishFailed(e.to_string()));
        }
    }

    fn end(&mut self, reason: EndReason) {
        info!(session = %self.session, ?reason, "coordinator_session_ended");
        self.status = SessionStatus::Ended(reason);
        self.notices.push(Notice::Ended(reason));
    }

    fn ensure_active(&self) -> SyncResult<()> {
        if self.status.is_ended() {
            return Err(SyncError::SessionEnded);
        }
        Ok(())
    }

    fn ensure_authority(&self) -> SyncResult<()> {
        self.ensure_active()?;
        if !self.is_authority() {
            return Err(SyncError::NotAuthority);
        }
        Ok(())
    }
}
