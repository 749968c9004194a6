//! Data types shared by several resource families.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

const NAIVE_FORMATS: [&str; 3] = ["%Y%m%dT%H%M%SZ", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// TLS certificate details of a web app or website.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SslInfo {
    /// Expiry of the certificate.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub not_after: DateTime<Utc>,
    /// Certificate type, e.g. `letsencrypt-auto-renew`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_type: Option<String>,
    /// Issuer common name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_name: Option<String>,
    /// Subject common name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
    /// Subject alternative names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_alternate_names: Vec<String>,
}

/// Parse a timestamp as the API reports it.
///
/// Accepts RFC 3339, the compact `20180824T171623Z` form and naive
/// date-times, which are taken to be UTC.
///
/// # Errors
///
/// Returns [`Error::ParseError`] if no known format matches.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::ParseError(format!("Unrecognized timestamp `{raw}`")))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
