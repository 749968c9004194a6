//! Website models.

use serde::{Deserialize, Serialize};

/// Website as reported by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Website {
    /// Numeric identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Owning user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Primary domain.
    pub domain_name: String,
    /// Whether the site is served.
    #[serde(default)]
    pub enabled: bool,
    /// Log file locations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logfiles: Option<WebsiteLogFiles>,
    /// Process serving the site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webapp: Option<WebsiteApp>,
}

/// Log file paths of a website.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebsiteLogFiles {
    /// Access log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    /// Error log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Server log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

/// Process definition behind a website.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebsiteApp {
    /// Identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Command line started for the site.
    pub command: String,
    /// Domains routed to the process.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<WebsiteDomain>,
}

/// Domain attached to a website.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebsiteDomain {
    /// Domain name.
    pub domain_name: String,
    /// Whether the domain is active.
    #[serde(default)]
    pub enabled: bool,
}
