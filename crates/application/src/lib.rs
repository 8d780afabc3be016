//! Todo Probe Application - Harness logic and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - The step runner and the fixed end-to-end scenario
//! - Application-level error handling

pub mod error;
pub mod harness;
pub mod ports;
pub mod testing;

pub use error::{ApplicationError, ApplicationResult};
pub use harness::{ApiTester, StepResult, run_scenario};
pub use ports::{Clock, HttpClient, HttpClientError, HttpFuture, Reporter};
pub use testing::AssertionRunner;
