//! Integration tests for turing-sandbox-automaton: hand-built machines run
//! through the interpreter, the evaluator and the built-in levels.

use anyhow::Result;
use turing_sandbox_automaton::{
    find_level, Evaluator, Interpreter, MachineStore, ProgressStore, RunConfig, RunStatus, Verdict,
};
use turing_sandbox_core::{
    AutomatonGraph, MachineDocument, Move, Position, StateId, Symbol, TransitionDraft,
};

// ============================================================================
// Machine builders
// ============================================================================

struct Machine {
    graph: AutomatonGraph,
}

impl Machine {
    fn new(dual_tape: bool) -> Self {
        Self {
            graph: AutomatonGraph::new(dual_tape),
        }
    }

    fn state(&mut self, column: usize, is_end: bool) -> StateId {
        self.graph
            .add_state(Position::new(column as f32 * 130.0, 0.0), is_end)
            .unwrap()
    }

    fn rule(&mut self, from: StateId, to: StateId, read: &str, write: Option<char>, movement: Move) {
        self.graph
            .add_transition(TransitionDraft::between(from, to).tape1(
                read.chars().map(Symbol),
                write.map(Symbol),
                movement,
            ))
            .unwrap();
    }
}

fn sym(s: &str) -> Vec<Symbol> {
    s.chars().map(Symbol).collect()
}

/// Accepts exactly `101`: reads the three symbols, then requires a blank.
fn accept_101() -> AutomatonGraph {
    let mut m = Machine::new(false);
    let q: Vec<StateId> = (0..5).map(|i| m.state(i, i == 4)).collect();
    m.rule(q[0], q[1], "1", None, Move::Right);
    m.rule(q[1], q[2], "0", None, Move::Right);
    m.rule(q[2], q[3], "1", None, Move::Right);
    m.rule(q[3], q[4], "_", None, Move::Stay);
    m.graph
}

/// Copies tape 1 onto tape 2.
fn copy_to_tape2() -> AutomatonGraph {
    let mut g = AutomatonGraph::dual_tape();
    let q0 = g.add_state(Position::new(0.0, 0.0), false).unwrap();
    let q1 = g.add_state(Position::new(130.0, 0.0), true).unwrap();
    for c in ['0', '1'] {
        g.add_transition(
            TransitionDraft::between(q0, q0)
                .tape1([Symbol(c)], None, Move::Right)
                .tape2(sym("_"), Some(Symbol(c)), Move::Right),
        )
        .unwrap();
    }
    g.add_transition(TransitionDraft::between(q0, q1).tape1(sym("_"), None, Move::Stay))
        .unwrap();
    g
}

/// Adds one to a binary number in place.
fn add_one() -> AutomatonGraph {
    let mut m = Machine::new(false);
    let scan = m.state(0, false);
    let carry = m.state(1, false);
    let done = m.state(2, true);
    m.rule(scan, scan, "01", None, Move::Right);
    m.rule(scan, carry, "_", None, Move::Left);
    m.rule(carry, carry, "1", Some('0'), Move::Left);
    m.rule(carry, done, "0_", Some('1'), Move::Stay);
    m.graph
}

// ============================================================================
// Interpreter scenarios
// ============================================================================

#[test]
fn test_accepts_101_in_four_steps() {
    let g = accept_101();
    let mut interp = Interpreter::new(RunConfig::fast());
    interp.load_input(&g, "101");
    interp.play(&g);
    while !interp.is_finished() {
        interp.step(&g);
    }
    assert_eq!(interp.status(), RunStatus::HaltedAccept);
    assert_eq!(interp.steps(), 4);
    assert_eq!(interp.current_state(), Some(StateId(4)));
}

#[test]
fn test_empty_input_rejected_without_moving() {
    let g = accept_101();
    let mut interp = Interpreter::new(RunConfig::fast());
    interp.load_input(&g, "");
    let before = interp.tape1().clone();
    interp.step(&g);
    assert_eq!(interp.status(), RunStatus::HaltedReject);
    assert_eq!(interp.tape1(), &before);
}

#[test]
fn test_partial_match_rejected_at_mismatch() -> Result<()> {
    let g = accept_101();
    let verdict = Evaluator::new(&g, RunConfig::fast()).accepts("100")?;
    assert_eq!(verdict, Verdict::Rejected);
    Ok(())
}

#[test]
fn test_dual_tape_copy() -> Result<()> {
    let g = copy_to_tape2();
    let run = Evaluator::new(&g, RunConfig::default()).transform("1101")?;
    assert_eq!(run.verdict, Verdict::Accepted);
    assert_eq!(run.output, "1101");
    assert_eq!(run.steps, 5);

    let mut interp = Interpreter::new(RunConfig::fast());
    interp.load_input(&g, "10");
    while !interp.is_finished() {
        interp.step(&g);
    }
    assert_eq!(interp.tape1().to_compact_string(), "10");
    assert_eq!(interp.tape2().map(|t| t.to_compact_string()), Some("10".to_string()));
    Ok(())
}

#[test]
fn test_runs_are_deterministic() -> Result<()> {
    let g = add_one();
    let evaluator = Evaluator::new(&g, RunConfig::default());
    let a = evaluator.transform("10111")?;
    let b = evaluator.transform("10111")?;
    assert_eq!(a, b);
    assert_eq!(a.output, "11000");
    Ok(())
}

// ============================================================================
// Levels
// ============================================================================

#[test]
fn test_accept_101_level_passes() -> Result<()> {
    let level = find_level("Accept 101").expect("builtin level");
    let report = Evaluator::new(&accept_101(), RunConfig::default()).run_level(&level)?;
    assert!(report.all_passed(), "failures: {:?}", report.failures().collect::<Vec<_>>());
    Ok(())
}

#[test]
fn test_tutorials_with_hand_built_solutions() -> Result<()> {
    // Accept every non-empty binary word.
    let mut nonempty = Machine::new(false);
    let q0 = nonempty.state(0, false);
    let q1 = nonempty.state(1, true);
    nonempty.rule(q0, q1, "01", None, Move::Right);

    // Blank out every symbol.
    let mut eraser = Machine::new(false);
    let e0 = eraser.state(0, false);
    let e1 = eraser.state(1, true);
    eraser.rule(e0, e0, "01", Some('_'), Move::Right);
    eraser.rule(e0, e1, "_", None, Move::Stay);

    let cases = [
        ("How to Play", nonempty.graph),
        ("How to Play 2: Transformations", eraser.graph),
        ("How to Play 3: Double Tape", copy_to_tape2()),
        ("Binaries: Add 1", add_one()),
    ];
    for (name, graph) in cases {
        let level = find_level(name).expect("builtin level");
        assert_eq!(level.dual_tape, graph.is_dual_tape(), "{name}");
        let report = Evaluator::new(&graph, RunConfig::default()).run_level(&level)?;
        assert!(report.all_passed(), "{name}: {:?}", report.failures().collect::<Vec<_>>());
    }
    Ok(())
}

#[test]
fn test_wrong_machine_fails_some_cases() -> Result<()> {
    let level = find_level("Flip 0s and 1s").expect("builtin level");
    let report = Evaluator::new(&add_one(), RunConfig::default()).run_level(&level)?;
    assert!(report.passed() < report.total());
    assert!(!report.all_passed());
    Ok(())
}

#[test]
fn test_step_cap_terminates_infinite_loop() -> Result<()> {
    let mut m = Machine::new(false);
    let q0 = m.state(0, false);
    m.state(1, true);
    m.rule(q0, q0, "01_", None, Move::Left);

    let level = find_level("How to Play").expect("builtin level");
    let report = Evaluator::new(&m.graph, RunConfig::default()).run_level(&level)?;
    assert!(report
        .cases
        .iter()
        .all(|c| c.verdict == Verdict::StepLimit));
    Ok(())
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_save_solution_and_record_progress() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let machines = MachineStore::new(dir.path());
    let progress = ProgressStore::new(dir.path());

    let document = MachineDocument::new("accept-101", &accept_101());
    machines.save(&document)?;
    let loaded = machines.load("accept-101")?;
    assert_eq!(loaded.graph(), accept_101());

    let level = find_level("Accept 101").expect("builtin level");
    let report = Evaluator::new(&loaded.graph(), RunConfig::default()).run_level(&level)?;
    if report.all_passed() {
        progress.mark_complete(&level.name, Some(loaded))?;
    }
    assert!(progress.is_complete("Accept 101")?);
    Ok(())
}
