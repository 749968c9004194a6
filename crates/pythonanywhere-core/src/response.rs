//! Fully-read API responses.
//!
//! [`ApiResponse`] is what the transport hands back for every status other
//! than 401. Resource clients decide success with [`ApiResponse::expect`].

use crate::classify;
use crate::error::{Error, Result};
use bytes::Bytes;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::borrow::Cow;

/// Decoded body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Body served as `application/json`
    Json(Value),
    /// Any other body, left as raw bytes
    Bytes(Bytes),
}

/// Status, content type and body of an API response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    content_type: Option<String>,
    body: Bytes,
}

impl ApiResponse {
    /// Assemble a response from its parts.
    #[must_use]
    pub fn new(status: StatusCode, content_type: Option<String>, body: Bytes) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    /// Read status, content type and body from a reqwest response.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be read.
    pub async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;
        Ok(Self::new(status, content_type, body))
    }

    /// HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Raw `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns true if the body is declared as JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Body parsed as JSON regardless of the declared content type.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|err| {
            Error::ParseError(format!(
                "Failed to parse response with status {}: {err}",
                self.status.as_u16()
            ))
        })
    }

    /// Body parsed as a JSON value, if it is one.
    #[must_use]
    pub fn json_value(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Decode the body as JSON when declared so, otherwise keep the bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if a body declared as JSON does not parse.
    pub fn into_payload(self) -> Result<Payload> {
        if self.is_json() {
            Ok(Payload::Json(self.json()?))
        } else {
            Ok(Payload::Bytes(self.body))
        }
    }

    /// Returns true if the status is one of `expected`.
    #[must_use]
    pub fn has_status(&self, expected: &[StatusCode]) -> bool {
        expected.contains(&self.status)
    }

    /// Keep the response if its status exactly matches one of `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] naming `context` for any other status.
    pub fn expect(self, expected: &[StatusCode], context: impl Into<String>) -> Result<Self> {
        if self.has_status(expected) {
            Ok(self)
        } else {
            Err(self.into_error(context))
        }
    }

    /// Turn the response into a generic API failure.
    #[must_use]
    pub fn into_error(self, context: impl Into<String>) -> Error {
        classify::unexpected_status(&self, context.into())
    }
}
