//! Response checks.
//!
//! Each harness step sends one request and evaluates a list of checks
//! against the response. A check pairs an [`Assertion`] with a
//! [`Severity`] deciding whether a failure affects the step verdict.

use serde::{Deserialize, Serialize};

/// A content assertion to run against a parsed response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check a JSON field exists and optionally its value.
    JsonPath {
        /// Dot-separated path, optionally rooted at `$` (e.g. `$.completed`).
        path: String,
        /// Expected value (as JSON).
        expected: Option<serde_json::Value>,
    },
    /// Compare the length of a JSON array body.
    JsonArrayLength {
        /// Comparison operator.
        operator: ComparisonOperator,
        /// Length to compare against.
        length: usize,
    },
    /// Every element of a JSON array body has `field == expected`.
    JsonArrayEach {
        /// Field name on each element.
        field: String,
        /// Required value.
        expected: serde_json::Value,
    },
    /// No element of a JSON array body has `field == value`.
    JsonArrayExcludes {
        /// Field name on each element.
        field: String,
        /// Forbidden value.
        value: serde_json::Value,
    },
}

impl Assertion {
    /// Shorthand for a field-equals assertion.
    #[must_use]
    pub fn field_equals(path: impl Into<String>, expected: serde_json::Value) -> Self {
        Self::JsonPath {
            path: path.into(),
            expected: Some(expected),
        }
    }

    /// Shorthand for a field-exists assertion.
    #[must_use]
    pub fn field_exists(path: impl Into<String>) -> Self {
        Self::JsonPath {
            path: path.into(),
            expected: None,
        }
    }

    /// Shorthand for an array-length assertion.
    #[must_use]
    pub const fn array_len(operator: ComparisonOperator, length: usize) -> Self {
        Self::JsonArrayLength { operator, length }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::JsonPath {
                path,
                expected: Some(v),
            } => format!("JSON {path} equals {v}"),
            Self::JsonPath {
                path,
                expected: None,
            } => format!("JSON {path} exists"),
            Self::JsonArrayLength { operator, length } => {
                format!("Array length {} {length}", operator.symbol())
            }
            Self::JsonArrayEach { field, expected } => {
                format!("Every element has {field} = {expected}")
            }
            Self::JsonArrayExcludes { field, value } => {
                format!("No element has {field} = {value}")
            }
        }
    }
}

/// Comparison operators for value assertions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    /// Equal to.
    Equals,
    /// Not equal to.
    NotEquals,
    /// Greater than.
    GreaterThan,
    /// Greater than or equal to.
    GreaterThanOrEqual,
    /// Less than.
    LessThan,
    /// Less than or equal to.
    LessThanOrEqual,
}

impl ComparisonOperator {
    /// Get the symbol for this operator.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
        }
    }

    /// Applies the operator as `actual <op> expected`.
    #[must_use]
    pub const fn compare(&self, actual: usize, expected: usize) -> bool {
        match self {
            Self::Equals => actual == expected,
            Self::NotEquals => actual != expected,
            Self::GreaterThan => actual > expected,
            Self::GreaterThanOrEqual => actual >= expected,
            Self::LessThan => actual < expected,
            Self::LessThanOrEqual => actual <= expected,
        }
    }
}

/// Whether a failed check fails its step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Failure fails the step.
    #[default]
    Blocking,
    /// Failure is reported as a warning only.
    Advisory,
}

/// An assertion attached to a step, with its severity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Check {
    /// The assertion to evaluate.
    pub assertion: Assertion,
    /// How a failure is counted.
    #[serde(default)]
    pub severity: Severity,
}

impl Check {
    /// A check whose failure fails the step.
    #[must_use]
    pub const fn blocking(assertion: Assertion) -> Self {
        Self {
            assertion,
            severity: Severity::Blocking,
        }
    }

    /// A check whose failure only produces a warning.
    #[must_use]
    pub const fn advisory(assertion: Assertion) -> Self {
        Self {
            assertion,
            severity: Severity::Advisory,
        }
    }
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(assertion: Assertion) -> Self {
        Self {
            assertion,
            passed: true,
            actual: None,
            error: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: true,
            actual: Some(actual.into()),
            error: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, error: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: false,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            assertion,
            passed: false,
            actual: Some(actual.into()),
            error: Some(error.into()),
        }
    }

    /// Returns the failure message, falling back to the assertion description.
    #[must_use]
    pub fn message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| self.assertion.description())
    }
}
