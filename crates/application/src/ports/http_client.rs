//! HTTP Client port

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use todo_probe_domain::{RequestSpec, ResponseSpec};

/// Future returned by [`HttpClient::execute`].
pub type HttpFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ResponseSpec, HttpClientError>> + Send + 'a>>;

/// Transport-level failures.
///
/// Any of these fails the step that triggered it; none aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
    /// The request timed out.
    #[error("request timed out")]
    Timeout,

    /// The host name could not be resolved.
    #[error("could not resolve host '{host}': {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying error message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection failed for another reason.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be encoded.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    BodyRead(String),

    /// Any other client error.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the harness to be exercised without a network.
pub trait HttpClient: Send + Sync {
    /// Sends `request` to the absolute `url` and returns the response.
    ///
    /// Every request carries `Content-Type: application/json`; the body
    /// is sent only for methods that carry one.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails due to network issues,
    /// timeout, or an unreadable response.
    fn execute(&self, url: &str, request: &RequestSpec) -> HttpFuture<'_>;
}
