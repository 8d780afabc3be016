//! Response check evaluation.

mod runner;

pub use runner::{AssertionRunner, query_json_path};
