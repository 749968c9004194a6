//! Authorized HTTP transport shared by every resource client.

use crate::classify;
use crate::config::AnywhereConfig;
use crate::error::{Error, Result};
use crate::response::ApiResponse;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Library name reported in the user agent.
pub const LIBRARY_NAME: &str = "pythonanywhere-core";

/// Library version reported in the user agent.
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the Rust toolchain the library was built with.
pub const RUSTC_VERSION: &str = env!("PYTHONANYWHERE_RUSTC_VERSION");

/// Compose the default `User-Agent` value.
///
/// `pythonanywhere-core/<version> (<client tag>; Rust/<rustc>)`, with the
/// client tag segment left out when there is none.
#[must_use]
pub fn compose_user_agent(client_tag: Option<&str>) -> String {
    match client_tag {
        Some(tag) => format!("{LIBRARY_NAME}/{LIBRARY_VERSION} ({tag}; Rust/{RUSTC_VERSION})"),
        None => format!("{LIBRARY_NAME}/{LIBRARY_VERSION} (Rust/{RUSTC_VERSION})"),
    }
}

/// Request body encodings used across the API.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
    /// JSON document
    Json(Value),
    /// Multipart upload of a single file field
    File {
        /// Form field name
        field: String,
        /// File contents
        content: Bytes,
    },
}

/// Executes authorized requests against the API.
#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
    config: AnywhereConfig,
    user_agent: String,
}

impl Transport {
    /// Build a transport for `config`.
    ///
    /// A missing token is not an error here; it is reported by each call.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AnywhereConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new();

        if !config.tls_verify() {
            warn!("TLS verification disabled for PythonAnywhere API client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            config: config.clone(),
            user_agent: compose_user_agent(config.client_tag()),
        })
    }

    /// Configuration the transport was built from.
    #[must_use]
    pub fn config(&self) -> &AnywhereConfig {
        &self.config
    }

    /// Default `User-Agent` value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Headers attached to every request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoToken`] if no token is configured.
    pub fn default_headers(&self) -> Result<HeaderMap> {
        let token = self
            .config
            .token()
            .filter(|_| self.config.has_token())
            .ok_or_else(|| Error::NoToken(self.config.token_error_message()))?;

        let mut authorization = HeaderValue::from_str(&format!("Token {}", token.expose_secret()))
            .map_err(|_| Error::ConfigError("API token contains invalid characters".to_string()))?;
        authorization.set_sensitive(true);

        let user_agent = HeaderValue::from_str(&self.user_agent).map_err(|_| {
            Error::ConfigError(format!("Invalid user agent `{}`", self.user_agent))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(USER_AGENT, user_agent);
        Ok(headers)
    }

    /// Send a request with the default headers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoToken`] without touching the network when no token
    /// is configured, [`Error::Authentication`] on HTTP 401, or a transport
    /// error. Every other status is returned as an [`ApiResponse`].
    pub async fn call(&self, method: Method, url: Url, body: RequestBody) -> Result<ApiResponse> {
        self.call_with_headers(method, url, body, HeaderMap::new())
            .await
    }

    /// Send a request, merging `headers` over the defaults key by key.
    ///
    /// # Errors
    ///
    /// Same as [`Transport::call`].
    pub async fn call_with_headers(
        &self,
        method: Method,
        url: Url,
        body: RequestBody,
        headers: HeaderMap,
    ) -> Result<ApiResponse> {
        let mut merged = self.default_headers()?;
        merged.extend(headers);

        debug!(%method, %url, "Sending PythonAnywhere API request");

        let mut request = self.http.request(method.clone(), url.clone()).headers(merged);
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Form(pairs) => request.form(&pairs),
            RequestBody::Json(value) => request.json(&value),
            RequestBody::File { field, content } => {
                let part = Part::bytes(content.to_vec()).file_name(field.clone());
                request.multipart(Form::new().part(field, part))
            }
        };

        let response = ApiResponse::read(request.send().await?).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(%method, %url, "PythonAnywhere API rejected the token");
            return Err(classify::authentication_error(
                response.status(),
                &response.text(),
            ));
        }

        debug!(%method, %url, status = response.status().as_u16(), "Received PythonAnywhere API response");
        Ok(response)
    }
}
