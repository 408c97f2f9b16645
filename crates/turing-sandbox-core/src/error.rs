//! Error types for graph editing.

use thiserror::Error;

use crate::graph::{Position, StateId};

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised when an edit cannot be applied to an automaton graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// Another state already sits at the snapped position.
    #[error("position ({}, {}) is occupied by state q{}", .position.x, .position.y, .occupant.0)]
    PositionOccupied { position: Position, occupant: StateId },

    /// A state referenced by ID does not exist.
    #[error("state not found: q{}", .id.0)]
    StateNotFound { id: StateId },

    /// No transition with this ordinal between the two states.
    #[error("transition not found: q{} -> q{} #{ordinal}", .from.0, .to.0)]
    TransitionNotFound {
        from: StateId,
        to: StateId,
        ordinal: usize,
    },

    /// The draft is missing a guard or a head movement.
    #[error("incomplete transition: {reason}")]
    IncompleteTransition { reason: String },

    /// The new transition could fire on the same symbols as an existing one.
    #[error("transition overlaps an existing transition from q{}", .state.0)]
    OverlappingGuards { state: StateId },

    /// Start states cannot be end states.
    #[error("state q{} is an end state and cannot be the start", .id.0)]
    EndStateAsStart { id: StateId },

    /// Every state id has been handed out.
    #[error("no state ids left")]
    IdsExhausted,
}
