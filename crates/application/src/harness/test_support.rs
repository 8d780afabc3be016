//! Test doubles for the harness ports.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use todo_probe_domain::{HttpMethod, RequestSpec, ResponseSpec, SkippedStep, StepRecord, TestRun};

use crate::ports::{Clock, HttpClient, HttpClientError, HttpFuture, Reporter};

/// Builds a JSON response with the given status and body.
pub fn json_response(status: u16, body: &str) -> ResponseSpec {
    let mut headers = HashMap::new();
    headers.insert("content-type".to_string(), "application/json".to_string());
    ResponseSpec::new(status, headers, body.as_bytes(), Duration::from_millis(3))
}

/// Mock HTTP client replaying scripted results in order.
///
/// Once the script is exhausted every call returns `fallback`.
pub struct MockHttpClient {
    script: Mutex<VecDeque<Result<ResponseSpec, HttpClientError>>>,
    fallback: Result<ResponseSpec, HttpClientError>,
    requests: Mutex<Vec<(HttpMethod, String)>>,
    bodies: Mutex<Vec<Option<serde_json::Value>>>,
}

impl MockHttpClient {
    pub fn with_responses(responses: Vec<Result<ResponseSpec, HttpClientError>>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            fallback: Err(HttpClientError::Other("no scripted response".to_string())),
            requests: Mutex::new(Vec::new()),
            bodies: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        let mut client = Self::with_responses(Vec::new());
        client.fallback = Err(HttpClientError::ConnectionRefused {
            host: "api.test".to_string(),
            port: 80,
        });
        client
    }

    pub fn requests(&self) -> Vec<(HttpMethod, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn bodies(&self) -> Vec<Option<serde_json::Value>> {
        self.bodies.lock().unwrap().clone()
    }
}

impl HttpClient for MockHttpClient {
    fn execute(&self, url: &str, request: &RequestSpec) -> HttpFuture<'_> {
        self.requests
            .lock()
            .unwrap()
            .push((request.method, url.to_string()));
        self.bodies
            .lock()
            .unwrap()
            .push(request.effective_body().cloned());
        let result = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        Box::pin(async move { result })
    }
}

/// Reporter remembering every event as a line of text.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<String>,
}

impl Reporter for RecordingReporter {
    fn run_started(&mut self, base_url: &str) {
        self.events.push(format!("start {base_url}"));
    }

    fn step_started(&mut self, name: &str) {
        self.events.push(format!("testing {name}"));
    }

    fn step_finished(&mut self, record: &StepRecord) {
        let verdict = if record.passed { "passed" } else { "failed" };
        self.events.push(format!("{verdict} {}", record.name));
    }

    fn note(&mut self, message: &str) {
        self.events.push(format!("note {message}"));
    }

    fn step_skipped(&mut self, step: &SkippedStep) {
        self.events.push(format!("skipped {}", step.name));
    }

    fn cleanup_started(&mut self, count: usize) {
        self.events.push(format!("cleanup {count}"));
    }

    fn run_finished(&mut self, run: &TestRun) {
        self.events
            .push(format!("finished {}/{}", run.tests_passed(), run.tests_run()));
    }
}

/// Clock pinned to a fixed instant.
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn noon() -> Self {
        Self(Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
