//! Configuration structures for PythonAnywhere clients.
//!
//! A configuration is an explicit value handed to each client. It can be
//! assembled with the `with_*` builders or read from the process environment
//! with [`AnywhereConfig::from_env`].

use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use validator::Validate;

/// Environment variable holding the API token.
pub const ENV_API_TOKEN: &str = "API_TOKEN";
/// Environment variable overriding the account username.
pub const ENV_USERNAME: &str = "PYTHONANYWHERE_USERNAME";
/// Environment variable naming the site host (set inside PythonAnywhere consoles).
pub const ENV_SITE: &str = "PYTHONANYWHERE_SITE";
/// Environment variable overriding the bare domain.
pub const ENV_DOMAIN: &str = "PYTHONANYWHERE_DOMAIN";
/// Environment variable disabling TLS verification when set to `true`.
pub const ENV_INSECURE_API: &str = "PYTHONANYWHERE_INSECURE_API";
/// Environment variable carrying the caller's client identifier.
pub const ENV_CLIENT: &str = "PYTHONANYWHERE_CLIENT";

/// Domain used when neither a site nor a domain override is configured.
pub const DEFAULT_DOMAIN: &str = "pythonanywhere.com";

const LOGIN_NAME_VARS: [&str; 3] = ["USER", "LOGNAME", "USERNAME"];

/// Configuration for a PythonAnywhere client instance.
#[derive(Debug, Clone, Validate)]
pub struct AnywhereConfig {
    #[validate(length(min = 1))]
    username: String,

    token: Option<Arc<SecretString>>,

    site: Option<String>,

    domain: Option<String>,

    #[validate(length(min = 1))]
    scheme: String,

    tls_verify: bool,

    client_tag: Option<String>,

    inside_hosting: bool,
}

impl AnywhereConfig {
    /// Create a configuration for `username` with no token and default host.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is empty.
    pub fn new(username: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            username: username.into(),
            token: None,
            site: None,
            domain: None,
            scheme: "https".to_string(),
            tls_verify: true,
            client_tag: None,
            inside_hosting: false,
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no username can be determined.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset, except for the token which is
    /// stored as given.
    ///
    /// # Errors
    ///
    /// Returns an error if no username can be determined.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let username = non_empty(ENV_USERNAME)
            .or_else(|| LOGIN_NAME_VARS.iter().find_map(|key| non_empty(*key)))
            .ok_or_else(|| {
                Error::ConfigError(format!(
                    "Could not determine your username; set {ENV_USERNAME}"
                ))
            })?;

        let site = non_empty(ENV_SITE);
        let inside_hosting = site.is_some();

        let mut config = Self::new(username)?
            .with_tls_verify(lookup(ENV_INSECURE_API).as_deref() != Some("true"))
            .with_inside_hosting(inside_hosting);

        if let Some(token) = lookup(ENV_API_TOKEN) {
            config = config.with_token(token);
        }
        if let Some(site) = site {
            config = config.with_site(site);
        }
        if let Some(domain) = non_empty(ENV_DOMAIN) {
            config = config.with_domain(domain);
        }
        if let Some(tag) = non_empty(ENV_CLIENT) {
            config = config.with_client_tag(tag);
        }

        Ok(config)
    }

    /// Set the API token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Arc::new(SecretString::from(token.into())));
        self
    }

    /// Set the explicit site host (takes precedence over the domain).
    #[must_use]
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    /// Set the bare domain; the host becomes `www.<domain>`.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the URL scheme used for API endpoints.
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set the client identifier embedded in the user agent.
    #[must_use]
    pub fn with_client_tag(mut self, tag: impl Into<String>) -> Self {
        self.client_tag = Some(tag.into());
        self
    }

    /// Mark the caller as running inside the hosting environment.
    #[must_use]
    pub const fn with_inside_hosting(mut self, inside: bool) -> Self {
        self.inside_hosting = inside;
        self
    }

    /// Account username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// API token, if one is configured.
    #[must_use]
    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_deref()
    }

    /// Returns true if a token is configured.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token
            .as_deref()
            .is_some_and(|token| !token.expose_secret().is_empty())
    }

    /// URL scheme used for API endpoints.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Whether TLS certificates are verified.
    #[must_use]
    pub const fn tls_verify(&self) -> bool {
        self.tls_verify
    }

    /// Client identifier embedded in the user agent.
    #[must_use]
    pub fn client_tag(&self) -> Option<&str> {
        self.client_tag.as_deref()
    }

    /// Whether the caller runs inside the hosting environment.
    #[must_use]
    pub const fn inside_hosting(&self) -> bool {
        self.inside_hosting
    }

    /// API host: the site if set, else `www.<domain>`, else the default.
    #[must_use]
    pub fn host(&self) -> String {
        match (&self.site, &self.domain) {
            (Some(site), _) => site.clone(),
            (None, Some(domain)) => format!("www.{domain}"),
            (None, None) => format!("www.{DEFAULT_DOMAIN}"),
        }
    }

    /// Message explaining how to obtain a token, worded for where the caller runs.
    #[must_use]
    pub fn token_error_message(&self) -> String {
        if self.inside_hosting {
            "Oops, you don't seem to have an API token.  \
             Please go to the 'Account' page on PythonAnywhere, then to the 'API Token' tab.  \
             Click the 'Create a new API token' button to create the token, then \
             start a new console and try running me again."
                .to_string()
        } else {
            "Oops, you don't seem to have an API_TOKEN environment variable set.  \
             Please go to the 'Account' page on PythonAnywhere, then to the 'API Token' tab.  \
             Click the 'Create a new API token' button to create the token, then \
             use it to set API_TOKEN environmental variable and try running me again."
                .to_string()
        }
    }
}
