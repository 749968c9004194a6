//! Web app models.

use pythonanywhere_core::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Python versions a web app can be created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PythonVersion {
    /// Python 3.6
    Python36,
    /// Python 3.7
    Python37,
    /// Python 3.8
    Python38,
    /// Python 3.9
    Python39,
    /// Python 3.10
    Python310,
    /// Python 3.11
    Python311,
    /// Python 3.12
    Python312,
    /// Python 3.13
    Python313,
}

impl PythonVersion {
    /// Dotted version, e.g. `3.10`.
    #[must_use]
    pub const fn version(&self) -> &'static str {
        match self {
            Self::Python36 => "3.6",
            Self::Python37 => "3.7",
            Self::Python38 => "3.8",
            Self::Python39 => "3.9",
            Self::Python310 => "3.10",
            Self::Python311 => "3.11",
            Self::Python312 => "3.12",
            Self::Python313 => "3.13",
        }
    }

    /// Identifier the API expects, e.g. `python310`.
    #[must_use]
    pub const fn api_name(&self) -> &'static str {
        match self {
            Self::Python36 => "python36",
            Self::Python37 => "python37",
            Self::Python38 => "python38",
            Self::Python39 => "python39",
            Self::Python310 => "python310",
            Self::Python311 => "python311",
            Self::Python312 => "python312",
            Self::Python313 => "python313",
        }
    }

    /// Returns all supported versions.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Python36,
            Self::Python37,
            Self::Python38,
            Self::Python39,
            Self::Python310,
            Self::Python311,
            Self::Python312,
            Self::Python313,
        ]
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.version())
    }
}

impl FromStr for PythonVersion {
    type Err = Error;

    /// Accepts either the dotted version or the API identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|version| version.version() == s || version.api_name() == s)
            .ok_or_else(|| Error::InvalidRequest(format!("Unsupported Python version: {s}")))
    }
}

/// Web app as reported by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Webapp {
    /// Numeric identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Owning user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Domain the app is served on.
    pub domain_name: String,
    /// API identifier of the Python version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python_version: Option<String>,
    /// Source code directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_directory: Option<String>,
    /// Working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    /// Virtualenv path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtualenv_path: Option<String>,
    /// Expiry date for free accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    /// Whether HTTP requests are redirected to HTTPS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_https: Option<bool>,
    /// Whether password protection is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_protection_enabled: Option<bool>,
    /// Password protection username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_protection_username: Option<String>,
}

/// Settings changed by a web app update. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebappPatch {
    /// Python version.
    pub python_version: Option<PythonVersion>,
    /// Virtualenv path.
    pub virtualenv_path: Option<String>,
    /// Source code directory.
    pub source_directory: Option<String>,
    /// Working directory.
    pub working_directory: Option<String>,
    /// Redirect HTTP to HTTPS.
    pub force_https: Option<bool>,
    /// Turn password protection on or off.
    pub password_protection_enabled: Option<bool>,
    /// Password protection username.
    pub password_protection_username: Option<String>,
    /// Password protection password.
    pub password_protection_password: Option<String>,
}

impl WebappPatch {
    /// Returns true if nothing would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_pairs().is_empty()
    }

    /// Convert the patch into form pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(version) = self.python_version {
            pairs.push(("python_version".to_string(), version.api_name().to_string()));
        }
        if let Some(path) = &self.virtualenv_path {
            pairs.push(("virtualenv_path".to_string(), path.clone()));
        }
        if let Some(path) = &self.source_directory {
            pairs.push(("source_directory".to_string(), path.clone()));
        }
        if let Some(path) = &self.working_directory {
            pairs.push(("working_directory".to_string(), path.clone()));
        }
        if let Some(force) = self.force_https {
            pairs.push(("force_https".to_string(), force.to_string()));
        }
        if let Some(enabled) = self.password_protection_enabled {
            pairs.push(("password_protection_enabled".to_string(), enabled.to_string()));
        }
        if let Some(username) = &self.password_protection_username {
            pairs.push(("password_protection_username".to_string(), username.clone()));
        }
        if let Some(password) = &self.password_protection_password {
            pairs.push(("password_protection_password".to_string(), password.clone()));
        }

        pairs
    }
}

/// Mapping of a URL prefix onto a directory served as static files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaticFileMapping {
    /// URL prefix, e.g. `/static/`.
    pub url: String,
    /// Directory served under the prefix.
    pub path: String,
}
