//! Run a machine once on a single input.

use anyhow::Result;
use turing_sandbox_automaton::{Halt, Interpreter, RejectReason, StepOutcome};
use turing_sandbox_core::AutomatonGraph;

use crate::commands::resolve_machine;
use crate::config::Config;

/// Options for `tsb run`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub machine: String,
    pub input: String,
    pub trace: bool,
    pub max_steps: Option<usize>,
}

pub fn execute(config: &Config, options: &RunOptions) -> Result<()> {
    let document = resolve_machine(config, &options.machine)?;
    if !document.alphabet.is_empty() {
        if let Some(symbol) = document.alphabet.first_foreign(&options.input) {
            anyhow::bail!("Input contains {:?}, which is not in the machine's alphabet", symbol);
        }
    }

    let graph = document.graph();
    for (a, b) in graph.conflicts() {
        eprintln!(
            "warning: transitions {} and {} overlap; the first one wins",
            graph.transitions()[a],
            graph.transitions()[b]
        );
    }

    let max_steps = options.max_steps.unwrap_or(config.transform_step_cap);
    let mut interp = Interpreter::new(config.run_config());
    interp.load_input(&graph, &options.input);
    interp.play(&graph);

    let mut view = graph.clone();
    if options.trace {
        view.set_active(interp.current_state());
        print_tapes(&interp, &view, "start");
    }
    while !interp.is_finished() && interp.steps() < max_steps {
        let outcome = interp.step(&graph);
        if options.trace {
            if let StepOutcome::Advanced { transition, .. } = &outcome {
                println!("step {:>4}  {}", interp.steps(), transition);
                view.set_active(interp.current_state());
                print_tapes(&interp, &view, "");
            }
        }
    }

    println!("Machine:  {}", document.name);
    println!("Input:    {:?}", options.input);
    let result = match interp.halt() {
        Some(Halt::Accepted) => "accepted".to_string(),
        Some(Halt::Rejected(RejectReason::NoStartState)) => "rejected (no start state)".to_string(),
        Some(Halt::Rejected(RejectReason::NoMatchingTransition)) => "rejected (no matching transition)".to_string(),
        None => format!("step limit reached ({} steps)", max_steps),
    };
    println!("Result:   {}", result);
    println!("Steps:    {}", interp.steps());
    match interp.current_state() {
        Some(id) => println!("State:    {}", id),
        None => println!("State:    (none)"),
    }
    println!("Tape 1:   {}", interp.tape1().to_compact_string());
    if let Some(tape2) = interp.tape2() {
        println!("Tape 2:   {}", tape2.to_compact_string());
    }
    Ok(())
}

fn print_tapes(interp: &Interpreter, view: &AutomatonGraph, label: &str) {
    match view.active_state() {
        Some(active) => println!("{:>10}  state {}", label, active.id),
        None => println!("{:>10}  state (none)", label),
    }
    println!("{:>10}  tape1 {}", "", interp.tape1());
    if let Some(tape2) = interp.tape2() {
        println!("{:>10}  tape2 {}", "", tape2);
    }
}
