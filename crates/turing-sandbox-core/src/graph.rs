//! Automaton graph: states, transitions and the edit operations on them.

use std::collections::HashMap;
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::{DeleteTarget, EditCommand, EditOutcome};
use crate::error::{GraphError, GraphResult};
use crate::symbol::Symbol;
use crate::transition::{Transition, TransitionDraft};

/// Distance between grid lines that state positions snap to.
pub const GRID_SPACING: f32 = 130.0;

/// Radius of a drawn state; two states closer than this collide.
pub const STATE_RADIUS: f32 = 35.0;

// =============================================================================
// Identifiers and layout
// =============================================================================

/// Identifier of a state within one graph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(pub u32);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Hands out state ids. Ids increase monotonically and are never reused,
/// even after the state holding one is deleted or the graph is cleared.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StateIdAllocator {
    next: u32,
    exhausted: bool,
}

impl StateIdAllocator {
    /// Start allocating at `next`.
    pub fn starting_at(next: u32) -> Self {
        Self {
            next,
            exhausted: false,
        }
    }

    /// Take the next id. Fails once `u32::MAX` has been handed out or observed.
    pub fn allocate(&mut self) -> GraphResult<StateId> {
        if self.exhausted {
            return Err(GraphError::IdsExhausted);
        }
        let id = StateId(self.next);
        match self.next.checked_add(1) {
            Some(next) => self.next = next,
            None => self.exhausted = true,
        }
        Ok(id)
    }

    /// The id the next call to [`allocate`](Self::allocate) returns, if any.
    pub fn peek(&self) -> Option<StateId> {
        (!self.exhausted).then_some(StateId(self.next))
    }

    /// Make sure `id` is never handed out again.
    pub fn observe(&mut self, id: StateId) {
        match id.0.checked_add(1) {
            Some(next) => self.next = self.next.max(next),
            None => self.exhausted = true,
        }
    }
}

/// Canvas position of a state. Layout only; never affects execution.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Nearest grid intersection.
    pub fn snapped(&self) -> Self {
        Self {
            x: (self.x / GRID_SPACING).round() * GRID_SPACING,
            y: (self.y / GRID_SPACING).round() * GRID_SPACING,
        }
    }

    /// Euclidean distance to another position.
    pub fn distance(&self, other: Position) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A node of the automaton.
#[derive(Debug, Clone)]
pub struct State {
    /// Unique identifier.
    pub id: StateId,
    /// Canvas position.
    pub position: Position,
    /// Execution begins here.
    pub is_start: bool,
    /// Reaching this state accepts.
    pub is_end: bool,
    /// Highlighted as the interpreter's current state. Never persisted.
    pub is_active: bool,
}

impl State {
    pub fn new(id: StateId, position: Position) -> Self {
        Self {
            id,
            position,
            is_start: false,
            is_end: false,
            is_active: false,
        }
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.position == other.position
            && self.is_start == other.is_start
            && self.is_end == other.is_end
    }
}

// =============================================================================
// Graph
// =============================================================================

/// States and transitions in insertion order, plus the tape mode.
///
/// All mutation goes through the methods below (or [`AutomatonGraph::apply`]),
/// which keep three invariants: at most one start state, no two transitions
/// leaving the same state overlap, and every transition references existing
/// states. Graphs loaded through `from_snapshot` may carry overlapping
/// transitions; see [`AutomatonGraph::conflicts`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutomatonGraph {
    dual_tape: bool,
    states: Vec<State>,
    transitions: Vec<Transition>,
    ids: StateIdAllocator,
}

impl AutomatonGraph {
    /// Empty graph in the given tape mode.
    pub fn new(dual_tape: bool) -> Self {
        Self {
            dual_tape,
            ..Self::default()
        }
    }

    /// Empty single-tape graph.
    pub fn single_tape() -> Self {
        Self::new(false)
    }

    /// Empty dual-tape graph.
    pub fn dual_tape() -> Self {
        Self::new(true)
    }

    pub fn is_dual_tape(&self) -> bool {
        self.dual_tape
    }

    pub fn set_dual_tape(&mut self, dual_tape: bool) {
        self.dual_tape = dual_tape;
    }

    /// Id allocator state, exposed for serialization.
    pub fn allocator(&self) -> &StateIdAllocator {
        &self.ids
    }

    pub(crate) fn from_parts(
        dual_tape: bool,
        states: Vec<State>,
        transitions: Vec<Transition>,
        ids: StateIdAllocator,
    ) -> Self {
        Self {
            dual_tape,
            states,
            transitions,
            ids,
        }
    }

    // -------------------------------------------------------------------------
    // Edits
    // -------------------------------------------------------------------------

    /// Add a state at the grid point nearest `position`.
    ///
    /// The first state of a graph is always the start state and never an end
    /// state. Later states become the start only while no start exists and
    /// they are not end states.
    pub fn add_state(&mut self, position: Position, is_end: bool) -> GraphResult<StateId> {
        let position = position.snapped();
        if let Some(occupant) = self.state_at(position) {
            return Err(GraphError::PositionOccupied {
                position,
                occupant: occupant.id,
            });
        }

        let id = self.ids.allocate()?;
        let first = self.states.is_empty();
        let mut state = State::new(id, position);
        state.is_end = is_end && !first;
        state.is_start = first || (self.start_state().is_none() && !is_end);

        debug!(
            state = state.id.0,
            x = position.x,
            y = position.y,
            is_start = state.is_start,
            is_end = state.is_end,
            "graph_add_state"
        );
        let id = state.id;
        self.states.push(state);
        Ok(id)
    }

    /// Validate a draft and append the resulting transition.
    pub fn add_transition(&mut self, draft: TransitionDraft) -> GraphResult<usize> {
        self.insert_transition(draft.into_transition()?)
    }

    /// Append a complete transition. Returns its index in insertion order.
    pub fn insert_transition(&mut self, transition: Transition) -> GraphResult<usize> {
        for id in [transition.source, transition.target] {
            if self.state(id).is_none() {
                return Err(GraphError::StateNotFound { id });
            }
        }
        if self
            .outgoing(transition.source)
            .any(|existing| existing.overlaps(&transition, self.dual_tape))
        {
            return Err(GraphError::OverlappingGuards {
                state: transition.source,
            });
        }

        debug!(
            source = transition.source.0,
            target = transition.target.0,
            "graph_add_transition"
        );
        self.transitions.push(transition);
        Ok(self.transitions.len() - 1)
    }

    /// Remove a state and every transition touching it.
    pub fn delete_state(&mut self, id: StateId) -> GraphResult<State> {
        let index = self
            .states
            .iter()
            .position(|s| s.id == id)
            .ok_or(GraphError::StateNotFound { id })?;
        let removed = self.states.remove(index);
        let before = self.transitions.len();
        self.transitions
            .retain(|t| t.source != id && t.target != id);

        debug!(
            state = id.0,
            transitions_removed = before - self.transitions.len(),
            "graph_delete_state"
        );
        Ok(removed)
    }

    /// Remove the `ordinal`-th transition (insertion order) from `source` to `target`.
    pub fn delete_transition(
        &mut self,
        source: StateId,
        target: StateId,
        ordinal: usize,
    ) -> GraphResult<Transition> {
        let index = self
            .transitions
            .iter()
            .enumerate()
            .filter(|(_, t)| t.source == source && t.target == target)
            .nth(ordinal)
            .map(|(i, _)| i)
            .ok_or(GraphError::TransitionNotFound {
                from: source,
                to: target,
                ordinal,
            })?;

        debug!(source = source.0, target = target.0, ordinal, "graph_delete_transition");
        Ok(self.transitions.remove(index))
    }

    /// Make `id` the start state, clearing the flag everywhere else.
    pub fn set_start(&mut self, id: StateId) -> GraphResult<()> {
        let state = self.state(id).ok_or(GraphError::StateNotFound { id })?;
        if state.is_end {
            return Err(GraphError::EndStateAsStart { id });
        }
        for s in &mut self.states {
            s.is_start = s.id == id;
        }
        debug!(state = id.0, "graph_set_start");
        Ok(())
    }

    /// Remove every state and transition. Ids already handed out stay retired.
    pub fn clear(&mut self) {
        self.states.clear();
        self.transitions.clear();
        debug!("graph_clear");
    }

    /// Highlight the interpreter's current state.
    pub fn set_active(&mut self, id: Option<StateId>) {
        for s in &mut self.states {
            s.is_active = Some(s.id) == id;
        }
    }

    /// The highlighted state, if any.
    pub fn active_state(&self) -> Option<&State> {
        self.states.iter().find(|s| s.is_active)
    }

    /// Apply an edit command. Solo editing and the replication authority
    /// both go through here.
    pub fn apply(&mut self, command: EditCommand) -> GraphResult<EditOutcome> {
        match command {
            EditCommand::AddState { position, is_end } => {
                self.add_state(position, is_end).map(EditOutcome::StateAdded)
            }
            EditCommand::AddTransition { draft } => {
                let source = draft.source;
                let index = self.add_transition(draft)?;
                Ok(EditOutcome::TransitionAdded { source, index })
            }
            EditCommand::Delete { target } => match target {
                DeleteTarget::State { id } => {
                    self.delete_state(id)?;
                    Ok(EditOutcome::StateDeleted(id))
                }
                DeleteTarget::Transition {
                    source,
                    target,
                    ordinal,
                } => {
                    self.delete_transition(source, target, ordinal)?;
                    Ok(EditOutcome::TransitionDeleted { source, target })
                }
            },
            EditCommand::SetStart { id } => {
                self.set_start(id)?;
                Ok(EditOutcome::StartChanged(id))
            }
            EditCommand::Clear => {
                self.clear();
                Ok(EditOutcome::Cleared)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    /// States in insertion order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Transitions in insertion order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Transitions leaving `id`, in insertion order.
    pub fn outgoing(&self, id: StateId) -> impl Iterator<Item = &Transition> + '_ {
        self.transitions.iter().filter(move |t| t.source == id)
    }

    /// First outgoing transition of `id` whose guards accept the read symbols.
    pub fn resolve(&self, id: StateId, s1: Symbol, s2: Option<Symbol>) -> Option<&Transition> {
        self.outgoing(id).find(|t| t.matches(s1, s2))
    }

    pub fn start_state(&self) -> Option<&State> {
        self.states.iter().find(|s| s.is_start)
    }

    /// State whose drawn circle covers `position`.
    pub fn state_at(&self, position: Position) -> Option<&State> {
        self.states
            .iter()
            .find(|s| s.position.distance(position) < STATE_RADIUS)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Pairs of transition indices (into [`transitions`](Self::transitions))
    /// that leave the same state and overlap.
    pub fn conflicts(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in self.transitions.iter().enumerate() {
            for (j, b) in self.transitions.iter().enumerate().skip(i + 1) {
                if a.source == b.source && a.overlaps(b, self.dual_tape) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Convert to a petgraph `DiGraph`, one edge per transition.
    /// Returns the graph and a mapping from `StateId` to `NodeIndex`.
    pub fn to_petgraph(&self) -> (DiGraph<StateId, usize>, HashMap<StateId, NodeIndex>) {
        let mut graph = DiGraph::new();
        let mut id_to_index = HashMap::new();

        for state in &self.states {
            let idx = graph.add_node(state.id);
            id_to_index.insert(state.id, idx);
        }

        for (i, t) in self.transitions.iter().enumerate() {
            if let (Some(&from), Some(&to)) = (id_to_index.get(&t.source), id_to_index.get(&t.target)) {
                graph.add_edge(from, to, i);
            }
        }

        (graph, id_to_index)
    }

    /// States no path from the start state reaches. Every state when there
    /// is no start.
    pub fn unreachable_states(&self) -> Vec<StateId> {
        let reachable = self.reachable_from_start();
        self.states
            .iter()
            .map(|s| s.id)
            .filter(|id| !reachable.contains(id))
            .collect()
    }

    /// Check if some end state is reachable from the start state.
    pub fn can_reach_end(&self) -> bool {
        self.reachable_from_start()
            .iter()
            .any(|id| self.state(*id).is_some_and(|s| s.is_end))
    }

    fn reachable_from_start(&self) -> Vec<StateId> {
        let Some(start) = self.start_state() else {
            return Vec::new();
        };
        let (graph, index) = self.to_petgraph();
        let Some(&root) = index.get(&start.id) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        let mut dfs = Dfs::new(&graph, root);
        while let Some(node) = dfs.next(&graph) {
            out.push(graph[node]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::Move;

    fn at(col: f32, row: f32) -> Position {
        Position::new(col * GRID_SPACING, row * GRID_SPACING)
    }

    fn sym(s: &str) -> Vec<Symbol> {
        s.chars().map(Symbol).collect()
    }

    #[test]
    fn test_first_state_is_start_never_end() {
        let mut g = AutomatonGraph::single_tape();
        let q0 = g.add_state(at(0.0, 0.0), true).unwrap();
        let s = g.state(q0).unwrap();
        assert!(s.is_start);
        assert!(!s.is_end);
    }

    #[test]
    fn test_set_active_highlights_one_state() {
        let mut g = AutomatonGraph::single_tape();
        let q0 = g.add_state(at(0.0, 0.0), false).unwrap();
        let q1 = g.add_state(at(1.0, 0.0), false).unwrap();

        g.set_active(Some(q0));
        g.set_active(Some(q1));
        assert_eq!(g.states().iter().filter(|s| s.is_active).count(), 1);
        assert_eq!(g.active_state().map(|s| s.id), Some(q1));

        g.set_active(None);
        assert!(g.active_state().is_none());
    }

    #[test]
    fn test_add_state_snaps_and_detects_collision() {
        let mut g = AutomatonGraph::single_tape();
        let q0 = g.add_state(Position::new(140.0, 10.0), false).unwrap();
        assert_eq!(g.state(q0).unwrap().position, Position::new(130.0, 0.0));

        let err = g.add_state(Position::new(120.0, -20.0), false).unwrap_err();
        assert!(matches!(err, GraphError::PositionOccupied { occupant, .. } if occupant == q0));
        assert_eq!(g.state_count(), 1);
    }

    #[test]
    fn test_start_assignment_when_missing() {
        let mut g = AutomatonGraph::single_tape();
        let q0 = g.add_state(at(0.0, 0.0), false).unwrap();
        g.delete_state(q0).unwrap();

        let q1 = g.add_state(at(1.0, 0.0), false).unwrap();
        assert!(g.state(q1).unwrap().is_start);

        g.delete_state(q1).unwrap();
        g.add_state(at(2.0, 0.0), false).unwrap();
        let accept = g.add_state(at(3.0, 0.0), true).unwrap();
        assert!(!g.state(accept).unwrap().is_start);
        assert_eq!(g.states().iter().filter(|s| s.is_start).count(), 1);
    }

    #[test]
    fn test_end_state_not_promoted_to_start() {
        let mut g = AutomatonGraph::single_tape();
        let q0 = g.add_state(at(0.0, 0.0), false).unwrap();
        g.add_state(at(1.0, 0.0), false).unwrap();
        g.delete_state(q0).unwrap();

        let end = g.add_state(at(2.0, 0.0), true).unwrap();
        assert!(!g.state(end).unwrap().is_start);
        assert!(g.start_state().is_none());
    }

    #[test]
    fn test_ids_never_reused() {
        let mut g = AutomatonGraph::single_tape();
        let q0 = g.add_state(at(0.0, 0.0), false).unwrap();
        let q1 = g.add_state(at(1.0, 0.0), false).unwrap();
        g.delete_state(q1).unwrap();
        g.clear();
        let q2 = g.add_state(at(0.0, 0.0), false).unwrap();
        assert_eq!(q0, StateId(0));
        assert_eq!(q2, StateId(2));
    }

    #[test]
    fn test_delete_state_removes_touching_transitions() {
        let mut g = AutomatonGraph::single_tape();
        let q0 = g.add_state(at(0.0, 0.0), false).unwrap();
        let q1 = g.add_state(at(1.0, 0.0), true).unwrap();
        g.add_transition(TransitionDraft::between(q0, q1).tape1(sym("1"), None, Move::Right))
            .unwrap();
        g.add_transition(TransitionDraft::between(q0, q0).tape1(sym("0"), None, Move::Right))
            .unwrap();

        g.delete_state(q1).unwrap();
        assert_eq!(g.transition_count(), 1);
        assert!(g.transitions().iter().all(|t| t.target == q0));
    }

    #[test]
    fn test_overlapping_transition_rejected() {
        let mut g = AutomatonGraph::single_tape();
        let q0 = g.add_state(at(0.0, 0.0), false).unwrap();
        let q1 = g.add_state(at(1.0, 0.0), false).unwrap();
        g.add_transition(TransitionDraft::between(q0, q1).tape1(sym("01"), None, Move::Right))
            .unwrap();

        let err = g
            .add_transition(TransitionDraft::between(q0, q0).tape1(sym("1_"), None, Move::Left))
            .unwrap_err();
        assert_eq!(err, GraphError::OverlappingGuards { state: q0 });
        assert_eq!(g.transition_count(), 1);
    }

    #[test]
    fn test_dual_tape_allows_disjoint_tape2_guards() {
        let mut g = AutomatonGraph::dual_tape();
        let q0 = g.add_state(at(0.0, 0.0), false).unwrap();
        g.add_transition(
            TransitionDraft::between(q0, q0)
                .tape1(sym("0"), None, Move::Right)
                .tape2(sym("0"), None, Move::Stay),
        )
        .unwrap();
        g.add_transition(
            TransitionDraft::between(q0, q0)
                .tape1(sym("0"), None, Move::Right)
                .tape2(sym("1"), None, Move::Stay),
        )
        .unwrap();
        assert_eq!(g.transition_count(), 2);
        assert!(g.conflicts().is_empty());
    }

    #[test]
    fn test_transition_to_unknown_state() {
        let mut g = AutomatonGraph::single_tape();
        let q0 = g.add_state(at(0.0, 0.0), false).unwrap();
        let err = g
            .add_transition(TransitionDraft::between(q0, StateId(9)).tape1(sym("0"), None, Move::Stay))
            .unwrap_err();
        assert_eq!(err, GraphError::StateNotFound { id: StateId(9) });
    }

    #[test]
    fn test_delete_transition_by_ordinal() {
        let mut g = AutomatonGraph::single_tape();
        let q0 = g.add_state(at(0.0, 0.0), false).unwrap();
        g.add_transition(TransitionDraft::between(q0, q0).tape1(sym("0"), None, Move::Right))
            .unwrap();
        g.add_transition(TransitionDraft::between(q0, q0).tape1(sym("1"), None, Move::Right))
            .unwrap();

        let removed = g.delete_transition(q0, q0, 1).unwrap();
        assert!(removed.tape1.guard.contains(&Symbol('1')));
        assert!(g.delete_transition(q0, q0, 1).is_err());
    }

    #[test]
    fn test_set_start_moves_flag() {
        let mut g = AutomatonGraph::single_tape();
        let q0 = g.add_state(at(0.0, 0.0), false).unwrap();
        let q1 = g.add_state(at(1.0, 0.0), false).unwrap();
        let q2 = g.add_state(at(2.0, 0.0), true).unwrap();

        g.set_start(q1).unwrap();
        assert_eq!(g.start_state().map(|s| s.id), Some(q1));
        assert!(!g.state(q0).unwrap().is_start);
        assert_eq!(g.set_start(q2), Err(GraphError::EndStateAsStart { id: q2 }));
    }

    #[test]
    fn test_reachability() {
        let mut g = AutomatonGraph::single_tape();
        let q0 = g.add_state(at(0.0, 0.0), false).unwrap();
        let q1 = g.add_state(at(1.0, 0.0), true).unwrap();
        let q2 = g.add_state(at(2.0, 0.0), false).unwrap();
        assert!(!g.can_reach_end());

        g.add_transition(TransitionDraft::between(q0, q1).tape1(sym("_"), None, Move::Stay))
            .unwrap();
        assert!(g.can_reach_end());
        assert_eq!(g.unreachable_states(), vec![q2]);
    }

    #[test]
    fn test_resolve_first_match_in_insertion_order() {
        let mut g = AutomatonGraph::single_tape();
        let q0 = g.add_state(at(0.0, 0.0), false).unwrap();
        let q1 = g.add_state(at(1.0, 0.0), false).unwrap();
        g.add_transition(TransitionDraft::between(q0, q1).tape1(sym("1"), None, Move::Right))
            .unwrap();
        g.add_transition(TransitionDraft::between(q0, q0).tape1(sym("0"), None, Move::Right))
            .unwrap();

        assert_eq!(g.resolve(q0, Symbol('0'), None).map(|t| t.target), Some(q0));
        assert_eq!(g.resolve(q0, Symbol('1'), None).map(|t| t.target), Some(q1));
        assert!(g.resolve(q0, Symbol::BLANK, None).is_none());
    }
}
