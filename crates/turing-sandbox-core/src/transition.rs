//! Transitions: per-tape guards and actions on an edge between two states.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::graph::StateId;
use crate::symbol::Symbol;

/// Head movement after a transition fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "S")]
    Stay,
}

impl Move {
    /// Single-letter label.
    pub fn label(&self) -> &'static str {
        match self {
            Move::Left => "L",
            Move::Right => "R",
            Move::Stay => "S",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Set of symbols a transition accepts on one tape.
pub type Guard = BTreeSet<Symbol>;

/// Guard and action for a single tape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeRule {
    /// Symbols that make the transition eligible.
    pub guard: Guard,
    /// Symbol to write; `None` leaves the cell alone.
    #[serde(default)]
    pub write: Option<Symbol>,
    /// Head movement.
    #[serde(rename = "move")]
    pub movement: Move,
}

impl TapeRule {
    /// Create a rule from its parts.
    pub fn new(guard: impl IntoIterator<Item = Symbol>, write: Option<Symbol>, movement: Move) -> Self {
        Self {
            guard: guard.into_iter().collect(),
            write,
            movement,
        }
    }

    /// An empty guard accepts every symbol.
    pub fn is_wildcard(&self) -> bool {
        self.guard.is_empty()
    }

    /// Check if `symbol` satisfies the guard.
    pub fn accepts(&self, symbol: Symbol) -> bool {
        self.is_wildcard() || self.guard.contains(&symbol)
    }

    /// Check if two guards share at least one symbol.
    pub fn overlaps(&self, other: &TapeRule) -> bool {
        self.is_wildcard()
            || other.is_wildcard()
            || self.guard.intersection(&other.guard).next().is_some()
    }
}

impl fmt::Display for TapeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard: Vec<String> = self.guard.iter().map(|s| s.to_string()).collect();
        if guard.is_empty() {
            write!(f, "*")?;
        } else {
            write!(f, "{}", guard.join(","))?;
        }
        if let Some(w) = self.write {
            write!(f, " -> {}", w)?;
        }
        write!(f, ", {}", self.movement)
    }
}

/// A directed edge between two states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    /// Source state.
    #[serde(rename = "sourceId")]
    pub source: StateId,
    /// Destination state (may equal `source`).
    #[serde(rename = "destId")]
    pub target: StateId,
    /// Tape-1 guard and action.
    pub tape1: TapeRule,
    /// Tape-2 guard and action; `None` reads anything and stays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tape2: Option<TapeRule>,
}

impl Transition {
    /// Single-tape transition.
    pub fn new(source: StateId, target: StateId, tape1: TapeRule) -> Self {
        Self {
            source,
            target,
            tape1,
            tape2: None,
        }
    }

    /// Attach a tape-2 rule.
    pub fn with_tape2(mut self, tape2: TapeRule) -> Self {
        self.tape2 = Some(tape2);
        self
    }

    /// Check if the transition is eligible for the symbols under the heads.
    ///
    /// `s2` is `None` in single-tape mode, in which case tape 2 is ignored.
    /// The tape-1 guard must be non-empty to match.
    pub fn matches(&self, s1: Symbol, s2: Option<Symbol>) -> bool {
        if !self.tape1.guard.contains(&s1) {
            return false;
        }
        match (s2, &self.tape2) {
            (Some(s2), Some(rule)) => rule.accepts(s2),
            _ => true,
        }
    }

    /// Check if both transitions could fire on the same read symbols.
    pub fn overlaps(&self, other: &Transition, dual_tape: bool) -> bool {
        if self.tape1.guard.intersection(&other.tape1.guard).next().is_none() {
            return false;
        }
        if !dual_tape {
            return true;
        }
        match (&self.tape2, &other.tape2) {
            (Some(a), Some(b)) => a.overlaps(b),
            _ => true,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{} -> q{}: {}", self.source.0, self.target.0, self.tape1)?;
        if let Some(rule) = &self.tape2 {
            write!(f, " || {}", rule)?;
        }
        Ok(())
    }
}

/// Editable guard/action for one tape, as produced by the transition editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeRuleDraft {
    #[serde(default)]
    pub guard: Guard,
    #[serde(default)]
    pub write: Option<Symbol>,
    #[serde(default, rename = "move")]
    pub movement: Option<Move>,
}

impl TapeRuleDraft {
    /// Draft from its parts.
    pub fn new(guard: impl IntoIterator<Item = Symbol>, write: Option<Symbol>, movement: Option<Move>) -> Self {
        Self {
            guard: guard.into_iter().collect(),
            write,
            movement,
        }
    }

    fn complete(self, tape: u8) -> GraphResult<TapeRule> {
        if self.guard.is_empty() {
            return Err(GraphError::IncompleteTransition {
                reason: format!("tape {} has no guard symbols", tape),
            });
        }
        let movement = self.movement.ok_or_else(|| GraphError::IncompleteTransition {
            reason: format!("tape {} has no head movement", tape),
        })?;
        Ok(TapeRule {
            guard: self.guard,
            write: self.write,
            movement,
        })
    }
}

impl From<TapeRule> for TapeRuleDraft {
    fn from(rule: TapeRule) -> Self {
        Self {
            guard: rule.guard,
            write: rule.write,
            movement: Some(rule.movement),
        }
    }
}

/// A transition as proposed by an editor, before completeness checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDraft {
    #[serde(rename = "sourceId")]
    pub source: StateId,
    #[serde(rename = "destId")]
    pub target: StateId,
    pub tape1: TapeRuleDraft,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tape2: Option<TapeRuleDraft>,
}

impl TransitionDraft {
    /// Empty draft between two states.
    pub fn between(source: StateId, target: StateId) -> Self {
        Self {
            source,
            target,
            tape1: TapeRuleDraft::default(),
            tape2: None,
        }
    }

    /// Set the tape-1 fields.
    pub fn tape1(mut self, guard: impl IntoIterator<Item = Symbol>, write: Option<Symbol>, movement: Move) -> Self {
        self.tape1 = TapeRuleDraft::new(guard, write, Some(movement));
        self
    }

    /// Set the tape-2 fields.
    pub fn tape2(mut self, guard: impl IntoIterator<Item = Symbol>, write: Option<Symbol>, movement: Move) -> Self {
        self.tape2 = Some(TapeRuleDraft::new(guard, write, Some(movement)));
        self
    }

    /// Turn the draft into a transition.
    ///
    /// Fails when tape 1 lacks a guard or a move, or when a tape-2 rule was
    /// provided without a guard or a move.
    pub fn into_transition(self) -> GraphResult<Transition> {
        let tape1 = self.tape1.complete(1)?;
        let tape2 = self.tape2.map(|d| d.complete(2)).transpose()?;
        Ok(Transition {
            source: self.source,
            target: self.target,
            tape1,
            tape2,
        })
    }
}

impl From<Transition> for TransitionDraft {
    fn from(t: Transition) -> Self {
        Self {
            source: t.source,
            target: t.target,
            tape1: t.tape1.into(),
            tape2: t.tape2.map(Into::into),
        }
    }
}
