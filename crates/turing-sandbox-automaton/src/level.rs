//! Levels: a named puzzle with an alphabet and either accept/reject examples
//! or transform test cases.
//!
//! The JSON shape matches saved and shared level files:
//!
//! ```json
//! {
//!   "name": "Accept 101",
//!   "level_type": "Starter",
//!   "description": "...",
//!   "detailedDescription": "...",
//!   "alphabet": ["0", "1", "_"],
//!   "objective": "...",
//!   "mode": "accept",
//!   "correct_examples": ["101"],
//!   "wrong_examples": ["0", "1"],
//!   "double_tape": false
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use turing_sandbox_core::Alphabet;

use crate::catalog::builtin_levels;
use crate::error::{AutomatonError, AutomatonResult};

/// Version written into share strings.
pub const SHARE_VERSION: u32 = 1;

/// Game name written into share strings.
pub const SHARE_GAME: &str = "Turing Sandbox";

/// Catalog section a level belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelKind {
    #[serde(alias = "tutorial")]
    Tutorial,
    #[serde(alias = "starter")]
    Starter,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "hard")]
    Hard,
    #[serde(rename = "sandbox", alias = "Sandbox")]
    Sandbox,
    /// User-made levels and anything unrecognized.
    #[serde(other)]
    Workshop,
}

impl LevelKind {
    pub fn label(&self) -> &'static str {
        match self {
            LevelKind::Tutorial => "Tutorial",
            LevelKind::Starter => "Starter",
            LevelKind::Medium => "Medium",
            LevelKind::Hard => "Hard",
            LevelKind::Sandbox => "Sandbox",
            LevelKind::Workshop => "Workshop",
        }
    }
}

/// One transform test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformTest {
    pub input: String,
    pub output: String,
}

/// How a level judges a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LevelMode {
    /// Accept every correct example and none of the wrong ones.
    Accept {
        #[serde(default)]
        correct_examples: Vec<String>,
        #[serde(default)]
        wrong_examples: Vec<String>,
    },
    /// Produce the expected output for every input.
    Transform {
        #[serde(default)]
        transform_tests: Vec<TransformTest>,
    },
}

impl LevelMode {
    /// Number of cases a report over this mode contains.
    pub fn case_count(&self) -> usize {
        match self {
            LevelMode::Accept {
                correct_examples,
                wrong_examples,
            } => correct_examples.len() + wrong_examples.len(),
            LevelMode::Transform { transform_tests } => transform_tests.len(),
        }
    }
}

/// A puzzle definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Unique name; also the key in level progress.
    pub name: String,
    /// Catalog section.
    #[serde(rename = "level_type")]
    pub kind: LevelKind,
    /// One-line summary.
    #[serde(default)]
    pub description: String,
    /// Longer explanation with examples.
    #[serde(default, rename = "detailedDescription")]
    pub detailed_description: String,
    /// Symbols inputs may use; always contains the blank.
    #[serde(default)]
    pub alphabet: Alphabet,
    /// What the machine has to do.
    #[serde(default)]
    pub objective: String,
    /// Judging rules.
    #[serde(flatten)]
    pub mode: LevelMode,
    /// Machines for this level run with a second tape.
    #[serde(default, rename = "double_tape")]
    pub dual_tape: bool,
}

impl Level {
    /// Accept-mode level with no examples yet.
    pub fn accept(name: impl Into<String>, kind: LevelKind, alphabet: &str) -> Self {
        Self {
            name: name.into(),
            kind,
            description: String::new(),
            detailed_description: String::new(),
            alphabet: Alphabet::parse(alphabet),
            objective: String::new(),
            mode: LevelMode::Accept {
                correct_examples: Vec::new(),
                wrong_examples: Vec::new(),
            },
            dual_tape: false,
        }
    }

    /// Transform-mode level with no tests yet.
    pub fn transform(name: impl Into<String>, kind: LevelKind, alphabet: &str) -> Self {
        Self {
            mode: LevelMode::Transform {
                transform_tests: Vec::new(),
            },
            ..Self::accept(name, kind, alphabet)
        }
    }

    /// Free-play level with the binary alphabet and nothing to check.
    pub fn sandbox() -> Self {
        Self::accept("Sandbox", LevelKind::Sandbox, "01_").describe(
            "Build anything.",
            "An empty canvas with no examples to satisfy.",
            "Experiment freely.",
        )
    }

    /// Replace accept examples. Switches the level to accept mode.
    pub fn examples(mut self, correct: &[&str], wrong: &[&str]) -> Self {
        self.mode = LevelMode::Accept {
            correct_examples: correct.iter().map(|s| s.to_string()).collect(),
            wrong_examples: wrong.iter().map(|s| s.to_string()).collect(),
        };
        self
    }

    /// Replace transform tests. Switches the level to transform mode.
    pub fn tests(mut self, cases: &[(&str, &str)]) -> Self {
        self.mode = LevelMode::Transform {
            transform_tests: cases
                .iter()
                .map(|(input, output)| TransformTest {
                    input: input.to_string(),
                    output: output.to_string(),
                })
                .collect(),
        };
        self
    }

    pub fn describe(
        mut self,
        description: impl Into<String>,
        detailed: impl Into<String>,
        objective: impl Into<String>,
    ) -> Self {
        self.description = description.into();
        self.detailed_description = detailed.into();
        self.objective = objective.into();
        self
    }

    pub fn with_dual_tape(mut self) -> Self {
        self.dual_tape = true;
        self
    }

    pub fn is_sandbox(&self) -> bool {
        self.kind == LevelKind::Sandbox
    }

    /// Encode as a share string.
    pub fn to_share_string(&self) -> AutomatonResult<String> {
        let envelope = ShareEnvelope {
            version: SHARE_VERSION,
            game: SHARE_GAME.to_string(),
            source: "Rust".to_string(),
            data: self.clone(),
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    /// Decode a share string.
    ///
    /// Accepts the `{"version":1,"data":{...}}` envelope, a workshop record
    /// whose `levelData` field holds an encoded envelope, or a bare level.
    pub fn from_share_string(source: &str) -> AutomatonResult<Self> {
        let value: Value = serde_json::from_str(source.trim())?;
        Self::from_share_value(value)
    }

    fn from_share_value(mut value: Value) -> AutomatonResult<Self> {
        if let Some(inner) = value.get("levelData") {
            let inner = inner.as_str().ok_or_else(|| AutomatonError::InvalidLevel {
                message: "levelData is not a string".to_string(),
            })?;
            value = serde_json::from_str(inner)?;
        }
        if let Some(data) = value.get_mut("data") {
            value = data.take();
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Serialize)]
struct ShareEnvelope {
    version: u32,
    game: String,
    source: String,
    data: Level,
}

/// Look up a built-in level by name (case-insensitive).
pub fn find_level(name: &str) -> Option<Level> {
    builtin_levels()
        .into_iter()
        .find(|l| l.name.eq_ignore_ascii_case(name))
}
