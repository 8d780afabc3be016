//! Console reporter
//!
//! Prints a human-readable progress line per step and a final score.

use std::io::{self, Write};

use todo_probe_application::ports::Reporter;
use todo_probe_domain::{SkippedStep, StepRecord, TestRun};

const RULE_WIDTH: usize = 60;

/// Reporter writing progress to a text sink (stdout by default).
pub struct ConsoleReporter<W: Write + Send> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    /// Creates a reporter printing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    /// Creates a reporter writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes one line; write errors are ignored.
    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    fn rule(&mut self) {
        self.line(&"=".repeat(RULE_WIDTH));
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn run_started(&mut self, base_url: &str) {
        self.rule();
        self.line("🚀 Starting To-Do App Backend API Tests");
        self.line(&format!("   Target: {base_url}"));
        self.rule();
    }

    fn step_started(&mut self, name: &str) {
        self.line(&format!("\n🔍 Testing {name}..."));
    }

    fn step_finished(&mut self, record: &StepRecord) {
        if record.passed {
            let status = record
                .status
                .map_or_else(|| "-".to_string(), |s| s.to_string());
            self.line(&format!("✅ Passed - Status: {status}"));
        } else {
            let mut failures = record.failures.iter();
            if let Some(first) = failures.next() {
                self.line(&format!("❌ Failed - {first}"));
            }
            for detail in failures {
                self.line(&format!("   {detail}"));
            }
        }
        for warning in &record.warnings {
            self.line(&format!("⚠️  Warning: {warning}"));
        }
    }

    fn note(&mut self, message: &str) {
        self.line(&format!("   {message}"));
    }

    fn step_skipped(&mut self, step: &SkippedStep) {
        self.line(&format!("\n⏭️  Skipped {} - {}", step.name, step.reason));
    }

    fn cleanup_started(&mut self, count: usize) {
        self.line(&format!("\n🧹 Cleaning up {count} created task(s)..."));
    }

    fn run_finished(&mut self, run: &TestRun) {
        self.line("");
        self.rule();
        self.line(&format!(
            "📊 Test Results: {}/{} passed",
            run.tests_passed(),
            run.tests_run()
        ));
        if run.warnings() > 0 {
            self.line(&format!("⚠️  {} warning(s)", run.warnings()));
        }
        if !run.skipped().is_empty() {
            self.line(&format!("⏭️  {} step(s) skipped", run.skipped().len()));
        }
        self.rule();

        if run.all_passed() {
            self.line("✅ All tests passed!");
        } else if run.tests_failed() > 0 {
            self.line(&format!("❌ {} test(s) failed", run.tests_failed()));
        } else {
            self.line("❌ Some steps could not run");
        }
        let _ = self.out.flush();
    }
}
