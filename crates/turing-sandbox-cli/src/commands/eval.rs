//! Grade a machine against a level.

use anyhow::{Context, Result};
use turing_sandbox_automaton::{Evaluator, Expectation, ProgressStore, Verdict};

use crate::commands::{resolve_level, resolve_machine};
use crate::config::Config;

pub fn execute(config: &Config, machine: &str, level: &str, save_progress: bool, json: bool) -> Result<()> {
    let document = resolve_machine(config, machine)?;
    let level = resolve_level(level)?;
    let graph = document.graph();

    if graph.is_dual_tape() != level.dual_tape {
        eprintln!(
            "warning: level {:?} expects a {} machine",
            level.name,
            if level.dual_tape { "dual-tape" } else { "single-tape" }
        );
    }

    let report = Evaluator::new(&graph, config.run_config())
        .run_level(&level)
        .with_context(|| format!("Failed to evaluate {:?}", level.name))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Level: {}", report.level);
        println!("{:-<40}", "");
        for case in &report.cases {
            let mark = if case.passed { "✓" } else { "✗" };
            let input = if case.input.is_empty() { "ε" } else { case.input.as_str() };
            let detail = match &case.expectation {
                Expectation::Output { expected } => format!(
                    "expected {:?}, got {:?}",
                    expected,
                    case.output.as_deref().unwrap_or_default()
                ),
                Expectation::Accept => format!("should accept, {}", verdict_label(case.verdict)),
                Expectation::Reject => format!("should reject, {}", verdict_label(case.verdict)),
            };
            println!("  {} {:<16} {}", mark, input, detail);
        }
        println!("{:-<40}", "");
        println!("Passed {}/{}", report.passed(), report.total());
    }

    if !report.all_passed() {
        anyhow::bail!("{} of {} cases failed", report.total() - report.passed(), report.total());
    }

    if save_progress {
        ProgressStore::new(&config.save_dir).mark_complete(&level.name, Some(document))?;
        if !json {
            println!("Progress saved for {:?}", level.name);
        }
    }
    Ok(())
}

fn verdict_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Accepted => "accepted",
        Verdict::Rejected => "rejected",
        Verdict::StepLimit => "hit the step limit",
    }
}
