//! Todo Probe Domain - Core types
//!
//! This crate defines the domain model for the to-do API harness:
//! request and response specs, the task model as seen over the wire,
//! response checks and the test-run accumulator.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod request;
pub mod response;
pub mod run;
pub mod task;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use request::{HttpMethod, JSON_CONTENT_TYPE, QueryParam, QueryParams, RequestSpec};
pub use response::{ResponseSpec, StatusCode};
pub use run::{SkippedStep, StepRecord, TestRun};
pub use task::{Category, NewTask, StatusFilter, TaskId, TaskUpdate};
pub use testing::{Assertion, AssertionResult, Check, ComparisonOperator, Severity};
