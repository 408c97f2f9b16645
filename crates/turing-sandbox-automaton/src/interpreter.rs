//! Step-by-step execution of an automaton graph over one or two tapes.
//!
//! The interpreter owns the tapes and the run state; the graph is borrowed on
//! every call, so the graph may be edited between steps. A current state
//! deleted in the meantime is re-pointed at the start state.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use turing_sandbox_core::{AutomatonGraph, StateId, Tape, Transition};

use crate::config::RunConfig;

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No run started, or just reset.
    Idle,
    /// Auto-run is active.
    Running,
    /// Auto-run suspended; manual steps still work.
    Paused,
    /// Reached an end state.
    HaltedAccept,
    /// Stopped without reaching an end state.
    HaltedReject,
}

impl RunStatus {
    pub fn is_halted(&self) -> bool {
        matches!(self, RunStatus::HaltedAccept | RunStatus::HaltedReject)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::Idle => "Idle",
            RunStatus::Running => "Running",
            RunStatus::Paused => "Paused",
            RunStatus::HaltedAccept => "Accepted",
            RunStatus::HaltedReject => "Rejected",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a run was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The graph has no start state.
    NoStartState,
    /// No outgoing transition matched the symbols under the heads.
    NoMatchingTransition,
}

/// Final result of a halted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Halt {
    Accepted,
    Rejected(RejectReason),
}

/// What a single [`Interpreter::step`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// A transition fired. The run may have halted on arrival at an end state.
    Advanced {
        from: StateId,
        to: StateId,
        transition: Transition,
    },
    /// The run is (now or already) halted.
    Halted(Halt),
}

/// Single- or dual-tape Turing machine interpreter.
#[derive(Clone)]
pub struct Interpreter {
    config: RunConfig,
    input: String,
    tape1: Tape,
    tape2: Option<Tape>,
    current: Option<StateId>,
    status: RunStatus,
    halt: Option<Halt>,
    timer: Duration,
    steps: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(RunConfig::default())
    }
}

impl Interpreter {
    /// Create an idle interpreter with empty tapes.
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            input: String::new(),
            tape1: Tape::default(),
            tape2: None,
            current: None,
            status: RunStatus::Idle,
            halt: None,
            timer: Duration::ZERO,
            steps: 0,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Store a new input and reset onto it.
    pub fn load_input(&mut self, graph: &AutomatonGraph, input: &str) {
        self.input = input.to_string();
        self.reset(graph);
    }

    /// Back to Idle at the start state with the tapes restored.
    pub fn reset(&mut self, graph: &AutomatonGraph) {
        self.tape1.set_contents(&self.input);
        self.tape2 = graph.is_dual_tape().then(|| Tape::new(""));
        self.current = graph.start_state().map(|s| s.id);
        self.status = RunStatus::Idle;
        self.halt = None;
        self.timer = Duration::ZERO;
        self.steps = 0;
        debug!(start = ?self.current.map(|id| id.0), input = %self.input, "interpreter_reset");
    }

    /// Start or resume auto-run. A halted run is reset first.
    pub fn play(&mut self, graph: &AutomatonGraph) {
        match self.status {
            RunStatus::Running => return,
            RunStatus::HaltedAccept | RunStatus::HaltedReject => self.reset(graph),
            RunStatus::Idle | RunStatus::Paused => {}
        }
        if self.resolve_current(graph).is_none() {
            self.finish(Halt::Rejected(RejectReason::NoStartState));
            return;
        }
        self.status = RunStatus::Running;
        debug!("interpreter_play");
    }

    /// Toggle between Running and Paused. No effect in other states.
    pub fn pause(&mut self) {
        self.status = match self.status {
            RunStatus::Running => RunStatus::Paused,
            RunStatus::Paused => RunStatus::Running,
            other => other,
        };
    }

    /// Perform exactly one resolution cycle.
    pub fn step(&mut self, graph: &AutomatonGraph) -> StepOutcome {
        if let Some(halt) = self.halt {
            return StepOutcome::Halted(halt);
        }

        let Some(id) = self.resolve_current(graph) else {
            return self.finish(Halt::Rejected(RejectReason::NoStartState));
        };
        if graph.state(id).is_some_and(|s| s.is_end) {
            return self.finish(Halt::Accepted);
        }

        let dual = graph.is_dual_tape();
        if dual && self.tape2.is_none() {
            self.tape2 = Some(Tape::new(""));
        }
        let s1 = self.tape1.read();
        let s2 = if dual {
            self.tape2.as_ref().map(Tape::read)
        } else {
            None
        };

        let Some(transition) = graph.resolve(id, s1, s2).cloned() else {
            debug!(state = id.0, read = %s1, "interpreter_no_match");
            return self.finish(Halt::Rejected(RejectReason::NoMatchingTransition));
        };

        if let Some(symbol) = transition.tape1.write {
            self.tape1.write(symbol);
        }
        self.tape1.apply(transition.tape1.movement);
        if dual {
            if let (Some(tape), Some(rule)) = (self.tape2.as_mut(), transition.tape2.as_ref()) {
                if let Some(symbol) = rule.write {
                    tape.write(symbol);
                }
                tape.apply(rule.movement);
            }
        }

        self.current = Some(transition.target);
        self.steps += 1;
        trace!(
            step = self.steps,
            from = id.0,
            to = transition.target.0,
            "interpreter_step"
        );

        if graph.state(transition.target).is_some_and(|s| s.is_end) {
            self.finish(Halt::Accepted);
        }
        StepOutcome::Advanced {
            from: id,
            to: transition.target,
            transition,
        }
    }

    /// Feed elapsed wall-clock time to auto-run. Steps at most once per call,
    /// when the accumulated time reaches the step delay.
    pub fn advance(&mut self, graph: &AutomatonGraph, dt: Duration) -> Option<StepOutcome> {
        if self.status != RunStatus::Running {
            return None;
        }
        self.timer += dt;
        if self.timer < self.config.step_delay() {
            return None;
        }
        self.timer = Duration::ZERO;
        Some(self.step(graph))
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// How the run ended, once it has.
    pub fn halt(&self) -> Option<Halt> {
        self.halt
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_halted()
    }

    pub fn accepted(&self) -> bool {
        self.status == RunStatus::HaltedAccept
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    /// Transitions fired since the last reset.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn tape1(&self) -> &Tape {
        &self.tape1
    }

    /// Second tape; present only in dual-tape mode.
    pub fn tape2(&self) -> Option<&Tape> {
        self.tape2.as_ref()
    }

    /// Compact contents of the tape holding a transform result.
    pub fn output(&self) -> String {
        self.tape2
            .as_ref()
            .unwrap_or(&self.tape1)
            .to_compact_string()
    }

    fn resolve_current(&mut self, graph: &AutomatonGraph) -> Option<StateId> {
        match self.current {
            Some(id) if graph.state(id).is_some() => Some(id),
            stale => {
                let start = graph.start_state().map(|s| s.id);
                if let Some(id) = stale {
                    warn!(state = id.0, start = ?start.map(|s| s.0), "interpreter_current_state_missing");
                }
                self.current = start;
                start
            }
        }
    }

    fn finish(&mut self, halt: Halt) -> StepOutcome {
        self.status = match halt {
            Halt::Accepted => RunStatus::HaltedAccept,
            Halt::Rejected(_) => RunStatus::HaltedReject,
        };
        self.halt = Some(halt);
        debug!(?halt, steps = self.steps, "interpreter_halt");
        StepOutcome::Halted(halt)
    }
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("status", &self.status)
            .field("current", &self.current)
            .field("steps", &self.steps)
            .field("tape1", &self.tape1.to_string())
            .field("tape2", &self.tape2.as_ref().map(|t| t.to_string()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turing_sandbox_core::{Move, Position, Symbol, TransitionDraft};

    /// q0 --1/R--> q1 --0/R--> q2 --1/R--> q3(end)
    fn accept_101() -> AutomatonGraph {
        let mut g = AutomatonGraph::single_tape();
        let ids: Vec<StateId> = (0..4)
            .map(|i| {
                g.add_state(Position::new(i as f32 * 130.0, 0.0), i == 3)
                    .unwrap()
            })
            .collect();
        for (i, c) in "101".chars().enumerate() {
            g.add_transition(
                TransitionDraft::between(ids[i], ids[i + 1]).tape1([Symbol(c)], None, Move::Right),
            )
            .unwrap();
        }
        g
    }

    fn run_to_halt(interp: &mut Interpreter, g: &AutomatonGraph) {
        for _ in 0..100 {
            if interp.is_finished() {
                return;
            }
            interp.step(g);
        }
    }

    #[test]
    fn test_accepts_101() {
        let g = accept_101();
        let mut interp = Interpreter::new(RunConfig::fast());
        interp.load_input(&g, "101");
        interp.play(&g);
        run_to_halt(&mut interp, &g);
        assert_eq!(interp.status(), RunStatus::HaltedAccept);
        assert_eq!(interp.steps(), 3);
        assert_eq!(interp.tape1().to_compact_string(), "101");
    }

    #[test]
    fn test_rejects_empty_input() {
        let g = accept_101();
        let mut interp = Interpreter::new(RunConfig::fast());
        interp.load_input(&g, "");
        let outcome = interp.step(&g);
        assert_eq!(
            outcome,
            StepOutcome::Halted(Halt::Rejected(RejectReason::NoMatchingTransition))
        );
        assert_eq!(interp.status(), RunStatus::HaltedReject);
    }

    #[test]
    fn test_step_after_halt_is_noop() {
        let g = accept_101();
        let mut interp = Interpreter::new(RunConfig::fast());
        interp.load_input(&g, "0");
        interp.step(&g);
        let tape = interp.tape1().clone();
        let again = interp.step(&g);
        assert!(matches!(again, StepOutcome::Halted(Halt::Rejected(_))));
        assert_eq!(interp.tape1(), &tape);
        assert_eq!(interp.steps(), 0);
    }

    #[test]
    fn test_no_start_state_rejects_on_play() {
        let g = AutomatonGraph::single_tape();
        let mut interp = Interpreter::new(RunConfig::fast());
        interp.load_input(&g, "1");
        interp.play(&g);
        assert_eq!(interp.halt(), Some(Halt::Rejected(RejectReason::NoStartState)));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let g = accept_101();
        let mut interp = Interpreter::new(RunConfig::fast());
        interp.load_input(&g, "10");
        interp.step(&g);
        interp.step(&g);

        interp.reset(&g);
        let once = format!("{:?}", interp);
        interp.reset(&g);
        assert_eq!(format!("{:?}", interp), once);
        assert_eq!(interp.status(), RunStatus::Idle);
        assert_eq!(interp.current_state(), Some(StateId(0)));
        assert_eq!(interp.tape1().head(), turing_sandbox_core::PADDING);
    }

    #[test]
    fn test_pause_toggles_only_while_running() {
        let g = accept_101();
        let mut interp = Interpreter::new(RunConfig::fast());
        interp.pause();
        assert_eq!(interp.status(), RunStatus::Idle);
        interp.play(&g);
        interp.pause();
        assert_eq!(interp.status(), RunStatus::Paused);
        interp.pause();
        assert_eq!(interp.status(), RunStatus::Running);
    }

    #[test]
    fn test_play_after_halt_restarts() {
        let g = accept_101();
        let mut interp = Interpreter::new(RunConfig::fast());
        interp.load_input(&g, "101");
        run_to_halt(&mut interp, &g);
        assert!(interp.accepted());

        interp.play(&g);
        assert_eq!(interp.status(), RunStatus::Running);
        assert_eq!(interp.steps(), 0);
        assert_eq!(interp.current_state(), Some(StateId(0)));
    }

    #[test]
    fn test_advance_waits_for_delay() {
        let g = accept_101();
        let mut interp = Interpreter::new(RunConfig::default());
        interp.load_input(&g, "101");
        assert!(interp.advance(&g, Duration::from_secs(5)).is_none());

        interp.play(&g);
        assert!(interp.advance(&g, Duration::from_millis(500)).is_none());
        let outcome = interp.advance(&g, Duration::from_millis(300));
        assert!(matches!(outcome, Some(StepOutcome::Advanced { .. })));
        assert_eq!(interp.steps(), 1);
    }

    #[test]
    fn test_deleted_current_state_falls_back_to_start() {
        let mut g = accept_101();
        let mut interp = Interpreter::new(RunConfig::fast());
        interp.load_input(&g, "101");
        interp.step(&g);
        assert_eq!(interp.current_state(), Some(StateId(1)));

        g.delete_state(StateId(1)).unwrap();
        let outcome = interp.step(&g);
        assert_eq!(
            outcome,
            StepOutcome::Halted(Halt::Rejected(RejectReason::NoMatchingTransition))
        );
        assert_eq!(interp.current_state(), Some(StateId(0)));
    }
}
