//! Error types for PythonAnywhere API operations.
//!
//! Every resource client in the workspace reports failures through [`Error`].
//! The variants follow the classification applied to API responses: missing
//! credentials, rejected credentials, resource conflicts, the DNS remediation
//! case for reloads, and a generic API failure carrying the HTTP status.

use thiserror::Error;

/// Remediation text reported when a reload fails because the domain has no CNAME.
pub const MISSING_CNAME_MESSAGE: &str = "Could not find a CNAME for your website. If you're using an A record, \
CloudFlare, or some other way of pointing your domain at PythonAnywhere then that should not be a problem. \
If you're not, you should double-check your DNS setup.";

/// Sanity-check text reported when no API token is configured.
pub const MISSING_TOKEN_MESSAGE: &str = "Could not find your API token.\n\
You may need to create it on the Accounts page?\n\
You will also need to close this console and open a new one once you've done that.";

/// Main error type for PythonAnywhere operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// No API token is configured
    #[error("{0}")]
    NoToken(String),

    /// The API rejected the token (HTTP 401)
    #[error("{0}")]
    Authentication(String),

    /// A pre-flight check refused to continue
    #[error("{0}")]
    Sanity(String),

    /// A website with the requested domain already exists
    #[error("Domain already exists: {0}")]
    DomainAlreadyExists(String),

    /// Reload failed because no CNAME points at PythonAnywhere
    #[error("{}", MISSING_CNAME_MESSAGE)]
    MissingCname,

    /// Unexpected status returned by the API
    #[error("{context} failed, got {status}{}", detail_suffix(.detail))]
    Api {
        /// HTTP status code returned by the API
        status: u16,
        /// Description of the attempted operation
        context: String,
        /// Message extracted from the response body
        detail: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failed to parse an API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout: {0}")]
    Timeout(String),

    /// API host could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Specialized result type for PythonAnywhere operations.
pub type Result<T> = std::result::Result<T, Error>;

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {detail}")
    }
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoToken(_) => "NO_TOKEN",
            Self::Authentication(_) => "AUTHENTICATION",
            Self::Sanity(_) => "SANITY_CHECK",
            Self::DomainAlreadyExists(_) => "DOMAIN_ALREADY_EXISTS",
            Self::MissingCname => "MISSING_CNAME",
            Self::Api { .. } => "API_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Returns the HTTP status attached to the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Authentication(_) => Some(401),
            Self::MissingCname => Some(409),
            _ => None,
        }
    }

    /// Returns true when the caller can carry on after reporting the error.
    ///
    /// A missing CNAME does not stop the site from serving through an A record
    /// or a proxy, so the reload is reported rather than treated as fatal.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingCname)
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_) | Self::NoToken(_) | Self::ServiceUnavailable(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}
