//! Endpoint resolution for PythonAnywhere resource flavors.
//!
//! Every resource lives under
//! `<scheme>://<host>/api/<version>/user/<username>/<flavor>/`. The version is
//! a fixed lookup per flavor.

use crate::config::AnywhereConfig;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// API version segment of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// Legacy API
    V0,
    /// Current API (sites and domains)
    V1,
}

impl ApiVersion {
    /// Returns the path segment for the version.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V0 => "v0",
            Self::V1 => "v1",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported API resource families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    /// File storage
    Files,
    /// Legacy WSGI web apps
    Webapps,
    /// ASGI/command websites
    Websites,
    /// Custom domains
    Domains,
    /// Scheduled tasks
    Schedule,
    /// Students of a teacher account
    Students,
    /// CPU quota usage
    Cpu,
}

impl Flavor {
    /// Returns the flavor name as it appears in endpoint paths.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Files => "files",
            Self::Webapps => "webapps",
            Self::Websites => "websites",
            Self::Domains => "domains",
            Self::Schedule => "schedule",
            Self::Students => "students",
            Self::Cpu => "cpu",
        }
    }

    /// Returns all known flavors.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Files,
            Self::Webapps,
            Self::Websites,
            Self::Domains,
            Self::Schedule,
            Self::Students,
            Self::Cpu,
        ]
    }

    /// Returns the API version serving this flavor.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        match self {
            Self::Websites | Self::Domains => ApiVersion::V1,
            _ => ApiVersion::V0,
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Flavor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|flavor| flavor.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidRequest(format!("Unknown API flavor: {s}")))
    }
}

/// Build the base URL for `flavor` under the configured account.
///
/// # Errors
///
/// Returns an error if the configured host does not form a valid URL.
pub fn base_url(config: &AnywhereConfig, flavor: Flavor) -> Result<Url> {
    let raw = format!(
        "{}://{}/api/{}/user/{}/{}/",
        config.scheme(),
        config.host(),
        flavor.api_version(),
        config.username(),
        flavor.name(),
    );
    Url::parse(&raw).map_err(|err| Error::InvalidEndpoint(format!("Invalid API URL `{raw}`: {err}")))
}

/// Build the root URL of the configured site, used to resolve share links.
///
/// # Errors
///
/// Returns an error if the configured host does not form a valid URL.
pub fn site_root(config: &AnywhereConfig) -> Result<Url> {
    let raw = format!("{}://{}/", config.scheme(), config.host());
    Url::parse(&raw).map_err(|err| Error::InvalidEndpoint(format!("Invalid site URL `{raw}`: {err}")))
}

/// Append path `segments` to `base`, percent-encoding each one.
///
/// `/`, `%`, `?` and `#` inside a segment are escaped, so a segment never
/// spills into a sibling path, the query or the fragment. An empty final
/// segment keeps a trailing slash.
///
/// # Errors
///
/// Returns an error if `base` cannot carry a path.
pub fn extend_segments<'a, I>(base: &Url, segments: I) -> Result<Url>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| Error::InvalidEndpoint(format!("Cannot append a path to `{base}`")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Append the absolute file `path` below `base`/`prefix`.
///
/// Each component of `path` becomes its own escaped segment, so
/// `/home/bill/notes#1.txt` addresses that file and not `/home/bill/notes`.
///
/// # Errors
///
/// Returns an error if `base` cannot carry a path.
pub fn extend_file_path(base: &Url, prefix: &str, path: &str) -> Result<Url> {
    let relative = path.strip_prefix('/').unwrap_or(path);
    extend_segments(base, std::iter::once(prefix).chain(relative.split('/')))
}

/// Append the constant `suffix` to `base` verbatim.
///
/// Unlike [`Url::join`], absolute file paths in `suffix` are appended to the
/// base path instead of replacing it.
///
/// # Errors
///
/// Returns an error if the combined string is not a valid URL.
pub fn extend(base: &Url, suffix: &str) -> Result<Url> {
    let raw = format!("{}{}", base.as_str(), suffix);
    Url::parse(&raw).map_err(|err| Error::InvalidEndpoint(format!("Invalid API path `{suffix}`: {err}")))
}

/// Append `suffix` to `base` and set a single `path` query parameter.
///
/// # Errors
///
/// Returns an error if the combined string is not a valid URL.
pub fn extend_with_path_query(base: &Url, suffix: &str, path: &str) -> Result<Url> {
    let mut url = extend(base, suffix)?;
    url.query_pairs_mut().append_pair("path", path);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AnywhereConfig {
        AnywhereConfig::new("bill").unwrap()
    }

    #[test]
    fn test_default_base_url() {
        let url = base_url(&config(), Flavor::Webapps).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.pythonanywhere.com/api/v0/user/bill/webapps/"
        );
    }

    #[test]
    fn test_versions_per_flavor() {
        for flavor in Flavor::all() {
            let url = base_url(&config(), *flavor).unwrap();
            let expected = match flavor {
                Flavor::Websites | Flavor::Domains => "v1",
                _ => "v0",
            };
            assert_eq!(
                url.as_str(),
                format!(
                    "https://www.pythonanywhere.com/api/{expected}/user/bill/{}/",
                    flavor.name()
                )
            );
        }
    }

    #[test]
    fn test_site_overrides_domain() {
        let config = config().with_site("www.foo.com").with_domain("wibble.com");
        let url = base_url(&config, Flavor::Files).unwrap();
        assert_eq!(url.as_str(), "https://www.foo.com/api/v0/user/bill/files/");
    }

    #[test]
    fn test_domain_override_adds_www() {
        let config = config().with_domain("foo.com");
        let url = base_url(&config, Flavor::Files).unwrap();
        assert_eq!(url.as_str(), "https://www.foo.com/api/v0/user/bill/files/");
    }

    #[test]
    fn test_flavor_from_str() {
        assert_eq!("websites".parse::<Flavor>().unwrap(), Flavor::Websites);
        assert_eq!("CPU".parse::<Flavor>().unwrap(), Flavor::Cpu);
        assert!("consoles".parse::<Flavor>().is_err());
    }

    #[test]
    fn test_extend_keeps_absolute_paths() {
        let base = base_url(&config(), Flavor::Files).unwrap();
        let url = extend(&base, "path/home/bill/README.txt").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.pythonanywhere.com/api/v0/user/bill/files/path/home/bill/README.txt"
        );
    }

    #[test]
    fn test_extend_file_path_escapes_url_syntax() {
        let base = base_url(&config(), Flavor::Files).unwrap();
        let url = extend_file_path(&base, "path", "/home/bill/notes#1 100%?.txt").unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), None);
        assert_eq!(
            url.path(),
            "/api/v0/user/bill/files/path/home/bill/notes%231%20100%25%3F.txt"
        );
    }

    #[test]
    fn test_extend_file_path_keeps_directory_slash() {
        let base = base_url(&config(), Flavor::Files).unwrap();
        let url = extend_file_path(&base, "path", "/var/log/").unwrap();
        assert_eq!(url.path(), "/api/v0/user/bill/files/path/var/log/");
    }

    #[test]
    fn test_extend_segments_escapes_slashes() {
        let base = base_url(&config(), Flavor::Websites).unwrap();
        let url = extend_segments(&base, ["a/b.com", "ssl", ""]).unwrap();
        assert_eq!(url.path(), "/api/v1/user/bill/websites/a%2Fb.com/ssl/");
    }

    #[test]
    fn test_extend_with_path_query() {
        let base = base_url(&config(), Flavor::Files).unwrap();
        let url = extend_with_path_query(&base, "tree/", "/home/bill").unwrap();
        assert_eq!(url.path(), "/api/v0/user/bill/files/tree/");
        assert_eq!(
            url.query_pairs().next().map(|(k, v)| (k.into_owned(), v.into_owned())),
            Some(("path".to_string(), "/home/bill".to_string()))
        );
    }

    #[test]
    fn test_site_root() {
        let url = site_root(&config().with_domain("eu.pythonanywhere.com")).unwrap();
        assert_eq!(url.as_str(), "https://www.eu.pythonanywhere.com/");
    }
}
