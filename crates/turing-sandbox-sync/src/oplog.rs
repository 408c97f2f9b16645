//! Append-only log of edits the authority accepted.
//!
//! Replaying the log over its base snapshot rebuilds the authority's graph,
//! which makes it usable for late-joiner catch-up or auditing without
//! shipping full snapshots.

use serde::{Deserialize, Serialize};
use turing_sandbox_core::{AutomatonGraph, EditCommand, GraphSnapshot};

use crate::error::SyncResult;
use crate::message::ParticipantId;

/// An accepted edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEdit {
    /// Revision of the first snapshot that included this edit.
    pub revision: u64,
    /// Who proposed it.
    pub author: ParticipantId,
    pub command: EditCommand,
}

/// Edits in acceptance order on top of a base snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpLog {
    base: GraphSnapshot,
    entries: Vec<LoggedEdit>,
}

impl OpLog {
    /// Empty log starting from `graph` as it is now.
    pub fn new(graph: &AutomatonGraph) -> Self {
        Self {
            base: graph.snapshot(),
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, revision: u64, author: ParticipantId, command: EditCommand) {
        self.entries.push(LoggedEdit {
            revision,
            author,
            command,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoggedEdit> {
        self.entries.iter()
    }

    /// Entries first included in a revision after `revision`.
    pub fn since(&self, revision: u64) -> impl Iterator<Item = &LoggedEdit> {
        self.entries.iter().filter(move |e| e.revision > revision)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuild the graph by applying every entry to the base snapshot.
    pub fn replay(&self) -> SyncResult<AutomatonGraph> {
        let mut graph = AutomatonGraph::from_snapshot(&self.base);
        for entry in &self.entries {
            graph.apply(entry.command.clone())?;
        }
        Ok(graph)
    }
}
