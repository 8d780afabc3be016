//! Step runner.
//!
//! `ApiTester` executes one request per step, compares the outcome with the
//! expectation, records the verdict in its `TestRun` and hands the parsed
//! body back to the caller.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use todo_probe_domain::{Check, RequestSpec, ResponseSpec, Severity, StepRecord, TestRun};
use tracing::{debug, warn};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{HttpClient, Reporter};
use crate::testing::AssertionRunner;

/// Maximum number of body characters echoed on a status mismatch.
pub const RESPONSE_SNIPPET_CHARS: usize = 200;

/// Outcome of a single step as seen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the step passed.
    pub success: bool,
    /// Parsed JSON body; an empty object when absent or unparsable.
    pub body: Value,
    /// Status code received, if a response arrived.
    pub status: Option<u16>,
}

impl StepResult {
    /// Number of elements when the body is a JSON array.
    #[must_use]
    pub fn item_count(&self) -> Option<usize> {
        self.body.as_array().map(Vec::len)
    }
}

/// Drives the API under test and accumulates results.
pub struct ApiTester<C: HttpClient, R: Reporter> {
    client: Arc<C>,
    reporter: R,
    base_url: String,
    run: TestRun,
    assertions: AssertionRunner,
}

impl<C: HttpClient, R: Reporter> ApiTester<C, R> {
    /// Creates a tester for the API rooted at `base_url`.
    pub fn new(client: Arc<C>, reporter: R, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            reporter,
            base_url,
            run: TestRun::new(),
            assertions: AssertionRunner::new(),
        }
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Results accumulated so far.
    #[must_use]
    pub const fn run(&self) -> &TestRun {
        &self.run
    }

    /// Mutable access to the accumulated results.
    pub const fn run_mut(&mut self) -> &mut TestRun {
        &mut self.run
    }

    /// The reporter receiving progress events.
    pub const fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    /// Consumes the tester, returning the run and the reporter.
    pub fn into_parts(self) -> (TestRun, R) {
        (self.run, self.reporter)
    }

    /// Executes one scored step.
    ///
    /// The step passes iff the status equals `expected_status` and every
    /// blocking check holds. Advisory checks that fail are recorded as
    /// warnings. Transport and parse errors fail the step and never
    /// propagate.
    pub async fn run_test(
        &mut self,
        name: &str,
        request: RequestSpec,
        expected_status: u16,
        checks: &[Check],
    ) -> StepResult {
        self.reporter.step_started(name);

        let (record, body) = match self.send(&request).await {
            Ok(response) => self.evaluate(name, &response, expected_status, checks),
            Err(e) => {
                warn!(step = name, error = %e, "Request failed");
                let mut record = StepRecord::new(name, None);
                record.fail(format!("Error: {e}"));
                (record, empty_body())
            }
        };

        let result = StepResult {
            success: record.passed,
            body,
            status: record.status,
        };
        self.reporter.step_finished(&record);
        self.run.record(record);
        result
    }

    /// Sends a request outside of scoring.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built or the request fails.
    pub async fn send(&self, request: &RequestSpec) -> ApplicationResult<ResponseSpec> {
        let url = request.full_url(&self.base_url)?;
        let start = Instant::now();
        let response = self.client.execute(url.as_str(), request).await?;

        debug!(
            method = %request.method,
            url = %url,
            status = response.status,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Request completed"
        );
        Ok(response)
    }

    /// Records a note for the reporter.
    pub fn note(&mut self, message: &str) {
        self.reporter.note(message);
    }

    fn evaluate(
        &self,
        name: &str,
        response: &ResponseSpec,
        expected_status: u16,
        checks: &[Check],
    ) -> (StepRecord, Value) {
        let mut record = StepRecord::new(name, Some(response.status));

        if response.status != expected_status {
            record.fail(format!("Expected {expected_status}, got {}", response.status));
            record.fail(format!(
                "Response: {}",
                response.snippet(RESPONSE_SNIPPET_CHARS)
            ));
            return (record, parse_body(response).unwrap_or_else(|_| empty_body()));
        }

        let body = match parse_body(response) {
            Ok(body) => body,
            Err(e) => {
                record.fail(format!("Error: {e}"));
                return (record, empty_body());
            }
        };

        for check in checks {
            let result = self.assertions.run_assertion(&check.assertion, &body);
            if result.passed {
                continue;
            }
            match check.severity {
                Severity::Blocking => record.fail(result.message()),
                Severity::Advisory => record.warn(result.message()),
            }
        }

        (record, body)
    }
}

fn parse_body(response: &ResponseSpec) -> ApplicationResult<Value> {
    response
        .json_body()
        .map_err(|e| ApplicationError::InvalidResponse(format!("malformed JSON body: {e}")))
}

fn empty_body() -> Value {
    Value::Object(serde_json::Map::new())
}
