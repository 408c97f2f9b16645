//! Batch evaluation of a machine against inputs and levels.
//!
//! Every run gets a fresh interpreter and a hard step cap, so evaluation
//! terminates even for machines that loop forever.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use turing_sandbox_core::{Alphabet, AutomatonGraph};

use crate::config::RunConfig;
use crate::error::{AutomatonError, AutomatonResult};
use crate::interpreter::{Interpreter, RunStatus};
use crate::level::{Level, LevelMode};

/// Outcome of one capped run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    Rejected,
    /// Still running when the step cap was reached. Counts as non-acceptance.
    StepLimit,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        *self == Verdict::Accepted
    }
}

/// Result of a transform run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRun {
    pub input: String,
    /// Compact contents of tape 2 in dual-tape mode, tape 1 otherwise.
    pub output: String,
    pub verdict: Verdict,
    pub steps: usize,
}

/// What a level case expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "expect", rename_all = "snake_case")]
pub enum Expectation {
    Accept,
    Reject,
    Output { expected: String },
}

/// Result of a single level case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    pub input: String,
    #[serde(flatten)]
    pub expectation: Expectation,
    pub verdict: Verdict,
    /// Produced output, for transform cases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub passed: bool,
}

/// Per-case results of evaluating a machine against a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelReport {
    pub level: String,
    pub cases: Vec<CaseResult>,
}

impl LevelReport {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed).count()
    }

    pub fn total(&self) -> usize {
        self.cases.len()
    }

    /// True when there is at least one case and every case passed.
    pub fn all_passed(&self) -> bool {
        !self.cases.is_empty() && self.passed() == self.total()
    }

    /// Cases that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.cases.iter().filter(|c| !c.passed)
    }
}

/// Runs a graph against inputs with step caps.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    graph: &'a AutomatonGraph,
    config: RunConfig,
    alphabet: Option<Alphabet>,
}

impl<'a> Evaluator<'a> {
    pub fn new(graph: &'a AutomatonGraph, config: RunConfig) -> Self {
        Self {
            graph,
            config,
            alphabet: None,
        }
    }

    /// Reject inputs with symbols outside `alphabet`.
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = Some(alphabet);
        self
    }

    /// Run `input` to completion or the accept step cap.
    pub fn accepts(&self, input: &str) -> AutomatonResult<Verdict> {
        self.validate(input)?;
        let (_, verdict) = self.run(input, self.config.accept_step_cap);
        Ok(verdict)
    }

    /// Run `input` to completion or the transform step cap and read the output.
    pub fn transform(&self, input: &str) -> AutomatonResult<TransformRun> {
        self.validate(input)?;
        let (interp, verdict) = self.run(input, self.config.transform_step_cap);
        Ok(TransformRun {
            input: input.to_string(),
            output: interp.output(),
            verdict,
            steps: interp.steps(),
        })
    }

    /// Evaluate every case of `level`.
    ///
    /// Wrong examples must not be accepted, correct examples must be, and
    /// transform cases must produce the expected output. A graph without a
    /// start state fails every case.
    pub fn run_level(&self, level: &Level) -> AutomatonResult<LevelReport> {
        let scoped = Evaluator {
            graph: self.graph,
            config: self.config.clone(),
            alphabet: Some(level.alphabet.clone()),
        };
        let has_start = self.graph.start_state().is_some();
        let mut cases = Vec::with_capacity(level.mode.case_count());

        match &level.mode {
            LevelMode::Accept {
                correct_examples,
                wrong_examples,
            } => {
                let expected = correct_examples
                    .iter()
                    .map(|w| (w, true))
                    .chain(wrong_examples.iter().map(|w| (w, false)));
                for (input, should_accept) in expected {
                    let verdict = scoped.accepts(input)?;
                    cases.push(CaseResult {
                        input: input.clone(),
                        expectation: if should_accept {
                            Expectation::Accept
                        } else {
                            Expectation::Reject
                        },
                        verdict,
                        output: None,
                        passed: has_start && verdict.is_accepted() == should_accept,
                    });
                }
            }
            LevelMode::Transform { transform_tests } => {
                for test in transform_tests {
                    let run = scoped.transform(&test.input)?;
                    cases.push(CaseResult {
                        input: test.input.clone(),
                        expectation: Expectation::Output {
                            expected: test.output.clone(),
                        },
                        verdict: run.verdict,
                        passed: has_start && run.output == test.output,
                        output: Some(run.output),
                    });
                }
            }
        }

        let report = LevelReport {
            level: level.name.clone(),
            cases,
        };
        info!(
            level = %level.name,
            passed = report.passed(),
            total = report.total(),
            "level_evaluated"
        );
        Ok(report)
    }

    fn validate(&self, input: &str) -> AutomatonResult<()> {
        if let Some(symbol) = self
            .alphabet
            .as_ref()
            .and_then(|a| a.first_foreign(input))
        {
            return Err(AutomatonError::InvalidInput {
                input: input.to_string(),
                symbol,
            });
        }
        Ok(())
    }

    fn run(&self, input: &str, cap: usize) -> (Interpreter, Verdict) {
        let mut interp = Interpreter::new(self.config.clone());
        interp.load_input(self.graph, input);
        interp.play(self.graph);

        for _ in 0..cap {
            if interp.is_finished() {
                break;
            }
            interp.step(self.graph);
        }

        let verdict = match interp.status() {
            RunStatus::HaltedAccept => Verdict::Accepted,
            RunStatus::HaltedReject => Verdict::Rejected,
            _ => Verdict::StepLimit,
        };
        debug!(input, ?verdict, steps = interp.steps(), "evaluation_run");
        (interp, verdict)
    }
}
