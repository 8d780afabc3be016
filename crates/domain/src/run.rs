//! Test-run accumulator.
//!
//! A `TestRun` is created when the harness starts and only grows: counters
//! never decrease and created ids are only appended.

use serde::Serialize;

use crate::task::TaskId;

/// Outcome of one executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    /// Human-readable step name.
    pub name: String,
    /// Whether the step passed.
    pub passed: bool,
    /// Status code received, if a response arrived.
    pub status: Option<u16>,
    /// Reasons the step failed.
    pub failures: Vec<String>,
    /// Advisory checks that did not hold.
    pub warnings: Vec<String>,
}

impl StepRecord {
    /// Creates a record with no failures or warnings.
    #[must_use]
    pub fn new(name: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            status,
            failures: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds a failure; the step no longer passes.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.passed = false;
        self.failures.push(reason.into());
    }

    /// Adds a warning; the verdict is unchanged.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// A step that was not executed because its input was missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedStep {
    /// Step name.
    pub name: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Accumulated state of one harness run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TestRun {
    tests_run: usize,
    tests_passed: usize,
    warnings: usize,
    created_ids: Vec<TaskId>,
    steps: Vec<StepRecord>,
    skipped: Vec<SkippedStep>,
}

impl TestRun {
    /// Creates an empty run.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tests_run: 0,
            tests_passed: 0,
            warnings: 0,
            created_ids: Vec::new(),
            steps: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Records an executed step and updates the counters.
    pub fn record(&mut self, step: StepRecord) {
        self.tests_run += 1;
        if step.passed {
            self.tests_passed += 1;
        }
        self.warnings += step.warnings.len();
        self.steps.push(step);
    }

    /// Records a step that could not run.
    pub fn skip(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedStep {
            name: name.into(),
            reason: reason.into(),
        });
    }

    /// Remembers a task created during the run for cleanup.
    pub fn track_created(&mut self, id: TaskId) {
        self.created_ids.push(id);
    }

    /// Number of executed steps.
    #[must_use]
    pub const fn tests_run(&self) -> usize {
        self.tests_run
    }

    /// Number of executed steps that passed.
    #[must_use]
    pub const fn tests_passed(&self) -> usize {
        self.tests_passed
    }

    /// Number of executed steps that failed.
    #[must_use]
    pub const fn tests_failed(&self) -> usize {
        self.tests_run - self.tests_passed
    }

    /// Number of advisory warnings raised.
    #[must_use]
    pub const fn warnings(&self) -> usize {
        self.warnings
    }

    /// Ids of tasks created during the run, in creation order.
    #[must_use]
    pub fn created_ids(&self) -> &[TaskId] {
        &self.created_ids
    }

    /// Executed steps in order.
    #[must_use]
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Skipped steps in order.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedStep] {
        &self.skipped
    }

    /// True if every executed step passed and nothing was skipped.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.tests_failed() == 0 && self.skipped.is_empty()
    }
}
