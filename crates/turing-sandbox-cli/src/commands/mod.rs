//! Command implementations.

pub mod config;
pub mod eval;
pub mod levels;
pub mod machines;
pub mod run;
pub mod serve;

use std::path::Path;

use anyhow::{Context, Result};
use turing_sandbox_automaton::{find_level, load_document, Level, MachineStore};
use turing_sandbox_core::MachineDocument;

use crate::config::Config;

/// A machine given as a file path or as the name of a saved machine.
pub fn resolve_machine(config: &Config, machine: &str) -> Result<MachineDocument> {
    let path = Path::new(machine);
    if path.is_file() {
        return load_document(path).with_context(|| format!("Failed to load machine from {}", path.display()));
    }
    MachineStore::new(&config.save_dir)
        .load(machine)
        .with_context(|| format!("No machine file or saved machine named {:?}", machine))
}

/// A level given as a built-in name or a level / share-string file.
pub fn resolve_level(level: &str) -> Result<Level> {
    if let Some(found) = find_level(level) {
        return Ok(found);
    }
    let path = Path::new(level);
    if !path.is_file() {
        anyhow::bail!("Unknown level {:?}. Run `tsb levels` to list built-in levels.", level);
    }
    let contents = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Level::from_share_string(&contents).with_context(|| format!("Failed to parse level file {}", path.display()))
}
