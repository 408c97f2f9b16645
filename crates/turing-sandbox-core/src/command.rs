//! Edit commands: the single vocabulary for mutating an automaton graph.

use serde::{Deserialize, Serialize};

use crate::graph::{Position, StateId};
use crate::transition::TransitionDraft;

/// What a delete request points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeleteTarget {
    /// A state and every transition touching it.
    State { id: StateId },
    /// The `ordinal`-th transition from `source` to `target`.
    Transition {
        source: StateId,
        target: StateId,
        ordinal: usize,
    },
}

/// A graph edit, as issued by a local editor or carried in a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    AddState {
        position: Position,
        #[serde(rename = "isEnd", default)]
        is_end: bool,
    },
    AddTransition {
        draft: TransitionDraft,
    },
    Delete {
        target: DeleteTarget,
    },
    SetStart {
        id: StateId,
    },
    Clear,
}

impl EditCommand {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            EditCommand::AddState { .. } => "add_state",
            EditCommand::AddTransition { .. } => "add_transition",
            EditCommand::Delete { .. } => "delete",
            EditCommand::SetStart { .. } => "set_start",
            EditCommand::Clear => "clear",
        }
    }
}

/// Result of a successfully applied [`EditCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    StateAdded(StateId),
    /// `index` is the position in the graph's transition list.
    TransitionAdded { source: StateId, index: usize },
    StateDeleted(StateId),
    TransitionDeleted { source: StateId, target: StateId },
    StartChanged(StateId),
    Cleared,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_json_is_tagged() {
        let cmd = EditCommand::Delete {
            target: DeleteTarget::Transition {
                source: StateId(1),
                target: StateId(2),
                ordinal: 0,
            },
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["op"], "delete");
        assert_eq!(json["target"]["kind"], "transition");
        assert_eq!(json["target"]["source"], 1);
    }

    #[test]
    fn test_add_state_is_end_defaults_false() {
        let cmd: EditCommand =
            serde_json::from_str(r#"{"op":"add_state","position":{"x":0.0,"y":130.0}}"#).unwrap();
        assert_eq!(
            cmd,
            EditCommand::AddState {
                position: Position::new(0.0, 130.0),
                is_end: false
            }
        );
    }
}
