//! Todo Probe Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus the harness configuration.

pub mod adapters;
pub mod config;

pub use adapters::{ConsoleReporter, ReqwestHttpClient, SystemClock};
pub use config::{BASE_URL_ENV, ConfigError, DEFAULT_BASE_URL, HarnessConfig};
