//! Error types for running, evaluating and persisting machines.

use thiserror::Error;
use turing_sandbox_core::GraphError;

/// Result type alias for automaton operations.
pub type AutomatonResult<T> = Result<T, AutomatonError>;

/// Errors that can occur outside the normal accept/reject outcomes of a run.
#[derive(Debug, Error)]
pub enum AutomatonError {
    /// An input uses a symbol the level's alphabet does not contain.
    #[error("invalid input {input:?}: symbol {symbol:?} is not in the alphabet")]
    InvalidInput { input: String, symbol: char },

    /// A level referenced by name was not found.
    #[error("level not found: {name}")]
    LevelNotFound { name: String },

    /// A saved machine referenced by name was not found.
    #[error("machine not found: {name}")]
    MachineNotFound { name: String },

    /// A machine name that cannot be used as a file name.
    #[error("invalid machine name: {name:?}")]
    InvalidName { name: String },

    /// A level definition or share string is malformed.
    #[error("invalid level: {message}")]
    InvalidLevel { message: String },

    /// A graph edit failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error (file operations).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
