//! Assertion runner.
//!
//! Evaluates step checks against a parsed JSON response body.

use serde_json::Value;
use todo_probe_domain::{Assertion, AssertionResult, ComparisonOperator};

/// Evaluates assertions against a response.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssertionRunner;

impl AssertionRunner {
    /// Create a new assertion runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run a single assertion against a parsed body.
    #[must_use]
    pub fn run_assertion(&self, assertion: &Assertion, body: &Value) -> AssertionResult {
        match assertion {
            Assertion::JsonPath { path, expected } => {
                check_json_path(assertion, body, path, expected.as_ref())
            }
            Assertion::JsonArrayLength { operator, length } => {
                check_array_length(assertion, body, *operator, *length)
            }
            Assertion::JsonArrayEach { field, expected } => {
                check_array_each(assertion, body, field, expected)
            }
            Assertion::JsonArrayExcludes { field, value } => {
                check_array_excludes(assertion, body, field, value)
            }
        }
    }
}

fn check_json_path(
    assertion: &Assertion,
    body: &Value,
    path: &str,
    expected: Option<&Value>,
) -> AssertionResult {
    match query_json_path(body, path) {
        Some(value) => match expected {
            Some(expected_value) if value != expected_value => AssertionResult::fail_with_value(
                assertion.clone(),
                value.to_string(),
                format!("JSON path '{path}' value mismatch: expected {expected_value}, got {value}"),
            ),
            _ => AssertionResult::pass_with_value(assertion.clone(), value.to_string()),
        },
        None => AssertionResult::fail(assertion.clone(), format!("JSON path '{path}' not found")),
    }
}

fn check_array_length(
    assertion: &Assertion,
    body: &Value,
    operator: ComparisonOperator,
    length: usize,
) -> AssertionResult {
    let Some(items) = body.as_array() else {
        return AssertionResult::fail(assertion.clone(), "Body is not a JSON array");
    };

    let actual = items.len();
    if operator.compare(actual, length) {
        AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
    } else {
        AssertionResult::fail_with_value(
            assertion.clone(),
            actual.to_string(),
            format!("Expected {} {length} items, got {actual}", operator.symbol()),
        )
    }
}

fn check_array_each(
    assertion: &Assertion,
    body: &Value,
    field: &str,
    expected: &Value,
) -> AssertionResult {
    let Some(items) = body.as_array() else {
        return AssertionResult::fail(assertion.clone(), "Body is not a JSON array");
    };

    match items.iter().find(|item| item.get(field) != Some(expected)) {
        None => AssertionResult::pass(assertion.clone()),
        Some(offender) => {
            let actual = offender.get(field).map_or_else(|| "missing".to_string(), Value::to_string);
            AssertionResult::fail_with_value(
                assertion.clone(),
                actual.clone(),
                format!("Expected every {field} to be {expected}, found {actual}"),
            )
        }
    }
}

fn check_array_excludes(
    assertion: &Assertion,
    body: &Value,
    field: &str,
    value: &Value,
) -> AssertionResult {
    let Some(items) = body.as_array() else {
        return AssertionResult::fail(assertion.clone(), "Body is not a JSON array");
    };

    if items.iter().any(|item| item.get(field) == Some(value)) {
        AssertionResult::fail(
            assertion.clone(),
            format!("Found an element with {field} = {value}"),
        )
    } else {
        AssertionResult::pass(assertion.clone())
    }
}

/// Resolves a dot-separated path such as `$.items.0.id`.
///
/// A leading `$` is optional. Numeric segments index into arrays.
#[must_use]
pub fn query_json_path<'a>(json: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.trim();
    let path = path.strip_prefix('$').unwrap_or(path);
    let path = path.strip_prefix('.').unwrap_or(path);

    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(json, |current, segment| match current {
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
            _ => current.get(segment),
        })
}
