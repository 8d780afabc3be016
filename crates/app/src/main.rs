//! Todo Probe - Main Entry Point
//!
//! Runs the end-to-end scenario against the configured to-do API and exits
//! with status 0 only when every step passed.

use std::process::ExitCode;
use std::sync::Arc;

use todo_probe_application::{ApiTester, run_scenario};
use todo_probe_infrastructure::{ConsoleReporter, HarnessConfig, ReqwestHttpClient, SystemClock};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Diagnostics go to stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match HarnessConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            return ExitCode::FAILURE;
        }
    };

    let client = match ReqwestHttpClient::new() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ could not create HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!(
        base_url = %config.base_url,
        "starting todo-probe v{}",
        env!("CARGO_PKG_VERSION")
    );

    let tester = ApiTester::new(Arc::new(client), ConsoleReporter::stdout(), config.base_url);
    let (run, _reporter) = run_scenario(tester, &SystemClock::new()).await;

    if run.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
