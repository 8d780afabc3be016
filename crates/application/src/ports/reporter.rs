//! Progress reporting port

use todo_probe_domain::{SkippedStep, StepRecord, TestRun};

/// Port receiving human-readable progress of a run.
///
/// The console adapter prints each event as it happens; tests use a
/// recording implementation.
pub trait Reporter: Send {
    /// The run is starting against `base_url`.
    fn run_started(&mut self, base_url: &str);

    /// A step is about to send its request.
    fn step_started(&mut self, name: &str);

    /// A step finished and was recorded.
    fn step_finished(&mut self, record: &StepRecord);

    /// Extra information about the last step (e.g. a result count).
    fn note(&mut self, message: &str);

    /// A step was skipped because its input was missing.
    fn step_skipped(&mut self, step: &SkippedStep);

    /// Cleanup of created tasks is starting.
    fn cleanup_started(&mut self, count: usize);

    /// The run is over.
    fn run_finished(&mut self, run: &TestRun);
}
