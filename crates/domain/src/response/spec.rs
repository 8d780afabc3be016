//! Response specification type
//!
//! Contains types for representing HTTP responses including
//! status codes, headers, body, and timing information.

use std::collections::HashMap;
use std::time::Duration;

/// Status codes the to-do API answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// 200 OK
    pub const OK: Self = Self(200);
    /// 201 Created
    pub const CREATED: Self = Self(201);
    /// 204 No Content
    pub const NO_CONTENT: Self = Self(204);
    /// 422 Unprocessable Entity
    pub const UNPROCESSABLE_ENTITY: Self = Self(422);

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

/// HTTP response as received from the API under test.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseSpec {
    /// HTTP status code.
    pub status: u16,
    /// Response headers as a map.
    pub headers: HashMap<String, String>,
    /// Response body as (lossy) UTF-8 text.
    pub body: String,
    /// Response time.
    pub duration: Duration,
    /// Content-Type header value (extracted for convenience).
    pub content_type: Option<String>,
}

impl ResponseSpec {
    /// Creates a new `ResponseSpec` from raw response data.
    #[must_use]
    pub fn new(
        status: u16,
        headers: HashMap<String, String>,
        body: &[u8],
        duration: Duration,
    ) -> Self {
        let content_type = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.clone());

        Self {
            status,
            headers,
            body: String::from_utf8_lossy(body).into_owned(),
            duration,
            content_type,
        }
    }

    /// Returns true if the response carries no payload to parse.
    ///
    /// A 204 response is treated as empty whatever its body holds.
    #[must_use]
    pub fn has_no_content(&self) -> bool {
        self.status == StatusCode::NO_CONTENT.as_u16() || self.body.trim().is_empty()
    }

    /// Parses the body as JSON.
    ///
    /// Empty bodies and 204 responses yield an empty JSON object.
    ///
    /// # Errors
    ///
    /// Returns the parse error if a non-empty body is not valid JSON.
    pub fn json_body(&self) -> Result<serde_json::Value, serde_json::Error> {
        if self.has_no_content() {
            return Ok(serde_json::Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&self.body)
    }

    /// Returns at most `max_chars` characters of the body.
    #[must_use]
    pub fn snippet(&self, max_chars: usize) -> &str {
        match self.body.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.body[..idx],
            None => &self.body,
        }
    }
}
