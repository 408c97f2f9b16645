//! Browse the built-in level catalog.

use anyhow::{Context, Result};
use turing_sandbox_automaton::{builtin_levels, find_level, Level, LevelMode, ProgressStore};

use crate::config::Config;

/// List every built-in level with its completion mark.
pub fn list(config: &Config) -> Result<()> {
    let progress = ProgressStore::new(&config.save_dir).load()?;
    for level in builtin_levels() {
        let done = progress.get(&level.name).is_some_and(|p| p.completed);
        println!(
            "[{}] {:<36} {:<9} {}{}",
            if done { "x" } else { " " },
            level.name,
            level.kind.label(),
            mode_label(&level),
            if level.dual_tape { ", two tapes" } else { "" }
        );
    }
    Ok(())
}

/// Print one level, or its share string.
pub fn show(name: &str, share: bool) -> Result<()> {
    let level = find_level(name).with_context(|| format!("Unknown level {:?}", name))?;
    if share {
        println!("{}", level.to_share_string()?);
        return Ok(());
    }

    println!("{}", level.name);
    println!("{:-<40}", "");
    println!("Kind:      {}", level.kind.label());
    println!("Mode:      {}", mode_label(&level));
    println!("Tapes:     {}", if level.dual_tape { 2 } else { 1 });
    let alphabet: String = level.alphabet.iter().map(|s| s.as_char()).collect();
    println!("Alphabet:  {}", alphabet);
    println!("Objective: {}", level.objective);
    println!();
    println!("{}", level.description);
    if !level.detailed_description.is_empty() {
        println!();
        println!("{}", level.detailed_description);
    }
    println!();
    match &level.mode {
        LevelMode::Accept {
            correct_examples,
            wrong_examples,
        } => {
            println!("Accept: {}", correct_examples.join(", "));
            println!("Reject: {}", wrong_examples.join(", "));
        }
        LevelMode::Transform { transform_tests } => {
            for test in transform_tests {
                println!("{} -> {}", test.input, test.output);
            }
        }
    }
    Ok(())
}

fn mode_label(level: &Level) -> &'static str {
    match level.mode {
        LevelMode::Accept { .. } => "accept",
        LevelMode::Transform { .. } => "transform",
    }
}
