//! Core domain types shared across the Turing Sandbox workspace.
//!
//! The automaton graph is the single piece of shared state: solo editing,
//! the interpreter, and collaborative replication all read or mutate it
//! through [`AutomatonGraph`] and [`EditCommand`].

pub mod command;
pub mod document;
pub mod error;
pub mod graph;
pub mod symbol;
pub mod tape;
pub mod transition;

pub use command::{DeleteTarget, EditCommand, EditOutcome};
pub use document::{GraphSnapshot, MachineDocument, StateRecord};
pub use error::{GraphError, GraphResult};
pub use graph::{
    AutomatonGraph, Position, State, StateId, StateIdAllocator, GRID_SPACING, STATE_RADIUS,
};
pub use symbol::{Alphabet, Symbol};
pub use tape::{Tape, PADDING};
pub use transition::{Guard, Move, TapeRule, TapeRuleDraft, Transition, TransitionDraft};
