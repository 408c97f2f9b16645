//! Lobby roster and the chat log.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::message::ParticipantId;

/// Chat messages kept per session.
pub const MAX_CHAT_MESSAGES: usize = 50;

/// Players required before the authority may start.
pub const MIN_PLAYERS_TO_START: usize = 2;

/// Who is in the session, in join order. The host is always first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lobby {
    host: ParticipantId,
    players: Vec<ParticipantId>,
    started: bool,
}

impl Lobby {
    pub fn new(host: ParticipantId) -> Self {
        Self {
            players: vec![host.clone()],
            host,
            started: false,
        }
    }

    pub fn host(&self) -> &ParticipantId {
        &self.host
    }

    pub fn players(&self) -> &[ParticipantId] {
        &self.players
    }

    /// Add a player. Returns false if already present.
    pub fn join(&mut self, player: ParticipantId) -> bool {
        if self.contains(&player) {
            return false;
        }
        self.players.push(player);
        true
    }

    /// Remove a player. Returns false if absent.
    pub fn leave(&mut self, player: &ParticipantId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p != player);
        self.players.len() != before
    }

    pub fn contains(&self, player: &ParticipantId) -> bool {
        self.players.contains(player)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn can_start(&self) -> bool {
        !self.started && self.players.len() >= MIN_PLAYERS_TO_START
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn mark_started(&mut self) {
        self.started = true;
    }
}

/// One chat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub sender: ParticipantId,
    pub message: String,
}

/// Most recent chat messages, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLog {
    entries: VecDeque<ChatEntry>,
    capacity: usize,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::with_capacity(MAX_CHAT_MESSAGES)
    }
}

impl ChatLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append, evicting the oldest entry when full.
    pub fn push(&mut self, sender: ParticipantId, message: String) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ChatEntry { sender, message });
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatEntry> {
        self.entries.iter()
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &ChatEntry> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
