//! End-to-end harness for the to-do API.
//!
//! - [`ApiTester`]: executes and scores single steps
//! - `todo_api`: one operation per API route
//! - [`run_scenario`]: the fixed ordered scenario

mod scenario;
mod tester;
mod todo_api;

#[cfg(test)]
mod test_support;

pub use scenario::{fixtures, run_scenario};
pub use tester::{ApiTester, RESPONSE_SNIPPET_CHARS, StepResult};
pub use todo_api::{TASKS_ENDPOINT, task_endpoint, toggle_endpoint};
