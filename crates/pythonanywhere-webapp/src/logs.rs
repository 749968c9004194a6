//! Web app log file naming.
//!
//! Logs live under `/var/log/` as `<domain>.<kind>.log` for the current file,
//! `<domain>.<kind>.log.1` for the first archive and
//! `<domain>.<kind>.log.<n>.gz` for older compressed archives.

use pythonanywhere_core::Error;
use std::fmt;
use std::str::FromStr;

/// Directory holding web app logs.
pub const LOG_DIRECTORY: &str = "/var/log/";

/// Kinds of web app log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    /// Request log
    Access,
    /// Application error log
    Error,
    /// Server process log
    Server,
}

impl LogKind {
    /// Name used in log file names.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Error => "error",
            Self::Server => "server",
        }
    }

    /// Returns all log kinds.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Access, Self::Error, Self::Server]
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::InvalidRequest(format!("Unknown log type: {s}")))
    }
}

/// Archive indices of the log files present for each kind.
///
/// Index 0 is the current file. Indices keep the order of the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFiles {
    /// Access log indices.
    pub access: Vec<u32>,
    /// Error log indices.
    pub error: Vec<u32>,
    /// Server log indices.
    pub server: Vec<u32>,
}

impl LogFiles {
    /// Collect the log files of `domain` from a directory listing.
    ///
    /// Names that do not follow the log naming scheme are skipped.
    pub fn from_listing<'a, I>(domain: &str, listing: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut logs = Self::default();
        for name in listing {
            if let Some((kind, index)) = parse_log_file_name(domain, name) {
                logs.indices_mut(kind).push(index);
            }
        }
        logs
    }

    /// Indices present for `kind`.
    #[must_use]
    pub fn indices(&self, kind: LogKind) -> &[u32] {
        match kind {
            LogKind::Access => &self.access,
            LogKind::Error => &self.error,
            LogKind::Server => &self.server,
        }
    }

    fn indices_mut(&mut self, kind: LogKind) -> &mut Vec<u32> {
        match kind {
            LogKind::Access => &mut self.access,
            LogKind::Error => &mut self.error,
            LogKind::Server => &mut self.server,
        }
    }
}

/// File name suffix after `.log` for an archive index.
#[must_use]
pub fn log_file_suffix(index: u32) -> String {
    match index {
        0 => String::new(),
        1 => ".1".to_string(),
        n => format!(".{n}.gz"),
    }
}

/// Parse an absolute log path into its kind and archive index.
///
/// Returns `None` for files of other domains, unknown kinds and names that
/// do not follow the naming scheme.
#[must_use]
pub fn parse_log_file_name(domain: &str, path: &str) -> Option<(LogKind, u32)> {
    let rest = path
        .strip_prefix(LOG_DIRECTORY)?
        .strip_prefix(domain)?
        .strip_prefix('.')?;

    let parts: Vec<&str> = rest.split('.').collect();
    let (kind, tail) = match parts.as_slice() {
        [kind, "log", tail @ ..] => (kind.parse::<LogKind>().ok()?, tail),
        _ => return None,
    };

    let index = match tail {
        [] => 0,
        ["1"] => 1,
        [n, "gz"] => n.parse::<u32>().ok()?,
        _ => return None,
    };

    Some((kind, index))
}
