//! Persistence for saved machines and level progress.
//!
//! ## File Structure
//!
//! ```text
//! <save dir>/
//! ├── <machine name>.json      # MachineDocument
//! └── progress/
//!     └── progress.json        # level name -> {completed, solution?}
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use turing_sandbox_core::MachineDocument;

use crate::error::{AutomatonError, AutomatonResult};

/// Subdirectory holding level progress.
const PROGRESS_DIR: &str = "progress";

/// Progress file name within the progress directory.
const PROGRESS_FILE: &str = "progress.json";

/// Extension of saved machine files.
const MACHINE_EXT: &str = "json";

// =============================================================================
// Machines
// =============================================================================

/// A saved machine as listed by [`MachineStore::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Directory of named machine documents.
#[derive(Debug, Clone)]
pub struct MachineStore {
    dir: PathBuf,
}

impl MachineStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if needed.
    pub fn init(&self) -> AutomatonResult<()> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
            debug!(path = %self.dir.display(), "save_dir_created");
        }
        Ok(())
    }

    /// Path a machine with this name is stored at.
    pub fn path_for(&self, name: &str) -> AutomatonResult<PathBuf> {
        let trimmed = name.trim();
        let invalid = trimmed.is_empty()
            || trimmed.starts_with('.')
            || trimmed.contains(['/', '\\', ':']);
        if invalid {
            return Err(AutomatonError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.dir.join(format!("{}.{}", trimmed, MACHINE_EXT)))
    }

    /// Save a document under its own name, replacing any existing file.
    pub fn save(&self, document: &MachineDocument) -> AutomatonResult<PathBuf> {
        self.init()?;
        let path = self.path_for(&document.name)?;
        let json = serde_json::to_string_pretty(document)?;
        std::fs::write(&path, json)?;

        info!(
            path = %path.display(),
            states = document.snapshot.states.len(),
            transitions = document.snapshot.transitions.len(),
            "machine_saved"
        );
        Ok(path)
    }

    /// Load a machine by name.
    pub fn load(&self, name: &str) -> AutomatonResult<MachineDocument> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(AutomatonError::MachineNotFound {
                name: name.to_string(),
            });
        }
        let document = load_document(&path)?;
        debug!(path = %path.display(), "machine_loaded");
        Ok(document)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.exists()).unwrap_or(false)
    }

    /// Remove a saved machine. Returns whether a file was removed.
    pub fn delete(&self, name: &str) -> AutomatonResult<bool> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        info!(path = %path.display(), "machine_deleted");
        Ok(true)
    }

    /// All readable saved machines, sorted by name. Unreadable files are
    /// skipped with a warning.
    pub fn list(&self) -> AutomatonResult<Vec<MachineEntry>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(MACHINE_EXT) {
                continue;
            }
            match load_document(&path) {
                Ok(doc) => entries.push(MachineEntry {
                    name: doc.name,
                    path,
                }),
                Err(e) => warn!(path = %path.display(), error = %e, "machine_unreadable_skipped"),
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Read a machine document from any path.
pub fn load_document(path: &Path) -> AutomatonResult<MachineDocument> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

// =============================================================================
// Level progress
// =============================================================================

/// Completion record for one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<MachineDocument>,
}

/// Level completion flags and solutions, stored in one JSON map.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// Progress store under `save_dir/progress/`.
    pub fn new(save_dir: impl AsRef<Path>) -> Self {
        Self {
            path: save_dir
                .as_ref()
                .join(PROGRESS_DIR)
                .join(PROGRESS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole map. A missing or corrupt file reads as empty.
    pub fn load(&self) -> AutomatonResult<BTreeMap<String, LevelProgress>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&json) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "progress_corrupt_ignored");
                Ok(BTreeMap::new())
            }
        }
    }

    fn save(&self, progress: &BTreeMap<String, LevelProgress>) -> AutomatonResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(progress)?)?;
        Ok(())
    }

    /// Record a level as completed, optionally with the solving machine.
    pub fn mark_complete(
        &self,
        level: &str,
        solution: Option<MachineDocument>,
    ) -> AutomatonResult<()> {
        let mut progress = self.load()?;
        progress.insert(
            level.to_string(),
            LevelProgress {
                completed: true,
                solution,
            },
        );
        self.save(&progress)?;
        info!(level, "level_completed");
        Ok(())
    }

    pub fn is_complete(&self, level: &str) -> AutomatonResult<bool> {
        Ok(self.load()?.get(level).is_some_and(|p| p.completed))
    }

    /// Stored solution for a level, if any.
    pub fn solution(&self, level: &str) -> AutomatonResult<Option<MachineDocument>> {
        Ok(self.load()?.remove(level).and_then(|p| p.solution))
    }

    /// Forget all progress.
    pub fn reset(&self) -> AutomatonResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!(path = %self.path.display(), "progress_reset");
        }
        Ok(())
    }
}
