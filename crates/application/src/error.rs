//! Application error types

use thiserror::Error;
use todo_probe_domain::DomainError;

use crate::ports::HttpClientError;

/// Application-level errors.
///
/// Inside a step these never propagate: they are turned into a failed
/// `StepRecord`.
#[derive(Debug, Clone, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// An HTTP request failed.
    #[error(transparent)]
    Http(#[from] HttpClientError),

    /// The response body could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
