//! Serialized shapes: graph snapshots and saved machine documents.
//!
//! A snapshot is the full state of a graph as JSON:
//!
//! ```json
//! {
//!   "dualTape": false,
//!   "states": [{"id": 0, "x": 0.0, "y": 0.0, "isStart": true, "isEnd": false}],
//!   "transitions": [{"sourceId": 0, "destId": 0,
//!                    "tape1": {"guard": ["1"], "write": null, "move": "R"}}],
//!   "nextStateId": 1
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::graph::{AutomatonGraph, Position, State, StateId, StateIdAllocator};
use crate::symbol::Alphabet;
use crate::transition::Transition;

/// One state as stored on disk or on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRecord {
    pub id: StateId,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub is_start: bool,
    #[serde(default)]
    pub is_end: bool,
}

impl From<&State> for StateRecord {
    fn from(s: &State) -> Self {
        Self {
            id: s.id,
            x: s.position.x,
            y: s.position.y,
            is_start: s.is_start,
            is_end: s.is_end,
        }
    }
}

/// Complete serialized graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    #[serde(default)]
    pub dual_tape: bool,
    #[serde(default)]
    pub states: Vec<StateRecord>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
    /// Next id the allocator hands out. Older files omit it, as do graphs
    /// that have used up every id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_state_id: Option<StateId>,
}

impl AutomatonGraph {
    /// Serialize the whole graph.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            dual_tape: self.is_dual_tape(),
            states: self.states().iter().map(StateRecord::from).collect(),
            transitions: self.transitions().to_vec(),
            next_state_id: self.allocator().peek(),
        }
    }

    /// Rebuild a graph from a snapshot.
    ///
    /// Loading is permissive: duplicate state ids and transitions pointing at
    /// missing states are dropped, only the first start flag survives, and
    /// overlapping transitions are kept (first match wins at run time) and
    /// reported through [`AutomatonGraph::conflicts`].
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        let mut ids = StateIdAllocator::starting_at(snapshot.next_state_id.map_or(0, |id| id.0));
        let mut seen = HashSet::new();
        let mut has_start = false;
        let mut states = Vec::with_capacity(snapshot.states.len());

        for record in &snapshot.states {
            if !seen.insert(record.id) {
                warn!(state = record.id.0, "snapshot_duplicate_state_dropped");
                continue;
            }
            ids.observe(record.id);
            let mut state = State::new(record.id, Position::new(record.x, record.y));
            state.is_end = record.is_end;
            state.is_start = record.is_start && !has_start;
            has_start |= state.is_start;
            states.push(state);
        }

        let transitions: Vec<Transition> = snapshot
            .transitions
            .iter()
            .filter(|t| {
                let ok = seen.contains(&t.source) && seen.contains(&t.target);
                if !ok {
                    warn!(
                        source = t.source.0,
                        target = t.target.0,
                        "snapshot_dangling_transition_dropped"
                    );
                }
                ok
            })
            .cloned()
            .collect();

        let graph = AutomatonGraph::from_parts(snapshot.dual_tape, states, transitions, ids);
        let conflicts = graph.conflicts();
        if !conflicts.is_empty() {
            warn!(
                count = conflicts.len(),
                "snapshot_overlapping_transitions"
            );
        }
        graph
    }
}

impl From<&AutomatonGraph> for GraphSnapshot {
    fn from(graph: &AutomatonGraph) -> Self {
        graph.snapshot()
    }
}

/// A named, saved machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineDocument {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub alphabet: Alphabet,
    #[serde(flatten)]
    pub snapshot: GraphSnapshot,
}

impl MachineDocument {
    /// Wrap a graph under a name, with the default alphabet.
    pub fn new(name: impl Into<String>, graph: &AutomatonGraph) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            alphabet: Alphabet::default(),
            snapshot: graph.snapshot(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Rebuild the graph this document holds.
    pub fn graph(&self) -> AutomatonGraph {
        AutomatonGraph::from_snapshot(&self.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::symbol::Symbol;
    use crate::transition::{Move, TapeRule, TransitionDraft};

    fn sample() -> AutomatonGraph {
        let mut g = AutomatonGraph::dual_tape();
        let q0 = g.add_state(Position::new(0.0, 0.0), false).unwrap();
        let q1 = g.add_state(Position::new(130.0, 0.0), true).unwrap();
        let q2 = g.add_state(Position::new(260.0, 0.0), false).unwrap();
        g.delete_state(q2).unwrap();
        g.add_transition(
            TransitionDraft::between(q0, q0)
                .tape1([Symbol('0')], None, Move::Right)
                .tape2([Symbol::BLANK], Some(Symbol('0')), Move::Right),
        )
        .unwrap();
        g.add_transition(TransitionDraft::between(q0, q1).tape1([Symbol::BLANK], None, Move::Stay))
            .unwrap();
        g
    }

    #[test]
    fn test_snapshot_round_trip() {
        let g = sample();
        let json = serde_json::to_string(&g.snapshot()).unwrap();
        let back: GraphSnapshot = serde_json::from_str(&json).unwrap();
        let restored = AutomatonGraph::from_snapshot(&back);
        assert_eq!(restored, g);
        assert_eq!(restored.allocator().peek(), Some(StateId(3)));
    }

    #[test]
    fn test_snapshot_field_names() {
        let json = serde_json::to_value(sample().snapshot()).unwrap();
        assert_eq!(json["dualTape"], true);
        assert_eq!(json["states"][0]["isStart"], true);
        assert_eq!(json["states"][1]["isEnd"], true);
        assert_eq!(json["transitions"][0]["tape2"]["write"], "0");
        assert_eq!(json["nextStateId"], 3);
    }

    #[test]
    fn test_load_is_permissive() {
        let mut snapshot = sample().snapshot();
        snapshot.states[1].is_start = true;
        snapshot.next_state_id = None;
        snapshot.transitions.push(Transition::new(
            StateId(0),
            StateId(42),
            TapeRule::new([Symbol('1')], None, Move::Right),
        ));
        snapshot.transitions.push(Transition::new(
            StateId(0),
            StateId(1),
            TapeRule::new([Symbol('0')], None, Move::Left),
        ));

        let g = AutomatonGraph::from_snapshot(&snapshot);
        assert_eq!(g.states().iter().filter(|s| s.is_start).count(), 1);
        assert_eq!(g.transition_count(), 3);
        assert_eq!(g.conflicts().len(), 1);
        assert_eq!(g.allocator().peek(), Some(StateId(2)));
    }

    #[test]
    fn test_add_state_fails_once_ids_run_out() {
        let snapshot = GraphSnapshot {
            dual_tape: false,
            states: vec![StateRecord {
                id: StateId(u32::MAX),
                x: 0.0,
                y: 0.0,
                is_start: true,
                is_end: false,
            }],
            transitions: Vec::new(),
            next_state_id: None,
        };
        let mut g = AutomatonGraph::from_snapshot(&snapshot);
        assert_eq!(g.allocator().peek(), None);

        let err = g.add_state(Position::new(130.0, 0.0), false).unwrap_err();
        assert_eq!(err, GraphError::IdsExhausted);
        assert_eq!(g.state_count(), 1);
        assert!(g.snapshot().next_state_id.is_none());
    }

    #[test]
    fn test_machine_document_flattens_snapshot() {
        let doc = MachineDocument::new("copy", &sample()).with_description("copies zeros");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["name"], "copy");
        assert_eq!(json["alphabet"][2], "_");
        assert!(json["states"].is_array());

        let back: MachineDocument = serde_json::from_value(json).unwrap();
        assert_eq!(back.graph(), sample());
    }
}
