//! Manage saved machines.

use std::path::Path;

use anyhow::{Context, Result};
use turing_sandbox_automaton::{load_document, MachineStore};

use crate::commands::resolve_machine;
use crate::config::Config;

pub fn list(config: &Config) -> Result<()> {
    let store = MachineStore::new(&config.save_dir);
    let entries = store.list()?;
    if entries.is_empty() {
        println!("No saved machines in {}", store.dir().display());
        return Ok(());
    }
    for entry in entries {
        println!("{}", entry.name);
    }
    Ok(())
}

pub fn show(config: &Config, name: &str) -> Result<()> {
    let document = resolve_machine(config, name)?;
    let graph = document.graph();

    println!("{}", document.name);
    println!("{:-<40}", "");
    if !document.description.is_empty() {
        println!("{}", document.description);
    }
    println!("Tapes:       {}", if graph.is_dual_tape() { 2 } else { 1 });
    println!("States:      {}", graph.state_count());
    println!("Transitions: {}", graph.transition_count());
    for state in graph.states() {
        let mut flags = Vec::new();
        if state.is_start {
            flags.push("start");
        }
        if state.is_end {
            flags.push("end");
        }
        println!(
            "  {:<5} ({:>6.0}, {:>6.0}) {}",
            state.id.to_string(),
            state.position.x,
            state.position.y,
            flags.join(", ")
        );
    }
    for transition in graph.transitions() {
        println!("  {}", transition);
    }

    let unreachable = graph.unreachable_states();
    if !unreachable.is_empty() {
        let ids: Vec<String> = unreachable.iter().map(|id| id.to_string()).collect();
        println!("Unreachable: {}", ids.join(", "));
    }
    if !graph.can_reach_end() {
        println!("warning: no end state is reachable from the start state");
    }
    if !graph.conflicts().is_empty() {
        println!("warning: {} pair(s) of overlapping transitions", graph.conflicts().len());
    }
    Ok(())
}

pub fn delete(config: &Config, name: &str) -> Result<()> {
    if MachineStore::new(&config.save_dir).delete(name)? {
        println!("Deleted {}", name);
        Ok(())
    } else {
        anyhow::bail!("No saved machine named {:?}", name)
    }
}

/// Copy a machine file into the save directory, optionally renaming it.
pub fn import(config: &Config, path: &Path, name: Option<&str>) -> Result<()> {
    let mut document =
        load_document(path).with_context(|| format!("Failed to load machine from {}", path.display()))?;
    if let Some(name) = name {
        document.name = name.to_string();
    }
    let saved = MachineStore::new(&config.save_dir).save(&document)?;
    println!("Imported {} to {}", document.name, saved.display());
    Ok(())
}
