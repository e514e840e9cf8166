//! HTTP response handling.
//!
//! Responses are buffered eagerly: 1C OData payloads are small JSON or XML
//! documents, and error reporting needs the body text after the fact.

use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorKind, Result};

/// A buffered HTTP response: status code, reason phrase and body text.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    reason: String,
    body: String,
}

impl Response {
    pub(crate) fn new(status: u16, reason: String, body: String) -> Self {
        Self {
            status,
            reason,
            body,
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Get the reason phrase for the status code.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body text.
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Decode the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(Into::into)
    }

    /// Check the response against the status the operation expects.
    ///
    /// Any other status is an `ErrorKind::Response` carrying the status
    /// code, reason phrase and body text. Never retried here; the caller
    /// decides what to do with the failure.
    pub fn expect_status(&self, expected: u16) -> Result<&Self> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(Error::new(ErrorKind::Response {
                status: self.status,
                reason: self.reason.clone(),
                body: self.body.clone(),
            }))
        }
    }
}
