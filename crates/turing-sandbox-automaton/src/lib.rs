//! Running Turing Sandbox machines.
//!
//! - [`Interpreter`]: step-by-step execution with play/pause/reset and
//!   timed auto-run.
//! - [`Evaluator`]: capped batch runs against inputs and [`Level`]s.
//! - [`MachineStore`] / [`ProgressStore`]: JSON persistence.

mod catalog;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod interpreter;
pub mod level;
pub mod persistence;

pub use catalog::builtin_levels;
pub use config::RunConfig;
pub use error::{AutomatonError, AutomatonResult};
pub use evaluation::{CaseResult, Evaluator, Expectation, LevelReport, TransformRun, Verdict};
pub use interpreter::{Halt, Interpreter, RejectReason, RunStatus, StepOutcome};
pub use level::{find_level, Level, LevelKind, LevelMode, TransformTest};
pub use persistence::{load_document, LevelProgress, MachineEntry, MachineStore, ProgressStore};
