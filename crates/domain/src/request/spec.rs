//! Request specification type

use serde::{Deserialize, Serialize};
use url::Url;

use super::{HttpMethod, QueryParams};
use crate::error::{DomainError, DomainResult};

/// Content type sent with every harness request.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Specification for one HTTP call against the API under test.
///
/// The endpoint is relative; it is joined to a base URL only when the
/// request is executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Endpoint path relative to the base URL (e.g. `api/tasks`)
    pub endpoint: String,
    /// Query parameters appended to the URL
    #[serde(default)]
    pub query: QueryParams,
    /// JSON body, sent only for methods that carry one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl RequestSpec {
    /// Creates a request with no body and no query parameters.
    #[must_use]
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: QueryParams::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Returns the body to send, if the method carries one.
    #[must_use]
    pub fn effective_body(&self) -> Option<&serde_json::Value> {
        if self.method.sends_body() {
            self.body.as_ref()
        } else {
            None
        }
    }

    /// Builds the absolute URL for this request.
    ///
    /// Exactly one `/` separates base and endpoint; an empty endpoint
    /// addresses the base URL's root.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the joined URL does not parse.
    pub fn full_url(&self, base_url: &str) -> DomainResult<Url> {
        let joined = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        );
        let mut url =
            Url::parse(&joined).map_err(|e| DomainError::InvalidUrl(format!("{e}: {joined}")))?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in self.query.iter() {
                pairs.append_pair(&param.key, &param.value);
            }
        }

        Ok(url)
    }
}
