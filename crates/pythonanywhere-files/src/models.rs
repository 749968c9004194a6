//! Files API models.

use bytes::Bytes;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Kind of a directory listing entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Anything the API may add later
    #[serde(other)]
    Other,
}

/// Entry of a directory listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// API URL of the entry.
    pub url: String,
}

/// Contents found at a path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathContents {
    /// Directory listing keyed by entry name
    Directory(BTreeMap<String, DirectoryEntry>),
    /// Raw file contents
    File(Bytes),
}

impl PathContents {
    /// Returns true for a directory listing.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }
}

/// Result of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// An existing file was overwritten (200)
    Updated,
    /// A new file was created (201)
    Created,
}

impl WriteOutcome {
    /// HTTP status the outcome corresponds to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Updated => StatusCode::OK,
            Self::Created => StatusCode::CREATED,
        }
    }
}

/// Result of sharing a file, with the absolute share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Newly shared (201)
    Shared(Url),
    /// Was already shared before (200)
    AlreadyShared(Url),
}

impl ShareOutcome {
    /// Absolute share link.
    #[must_use]
    pub const fn url(&self) -> &Url {
        match self {
            Self::Shared(url) | Self::AlreadyShared(url) => url,
        }
    }

    /// Human-readable description of the outcome.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Shared(_) => "successfully shared",
            Self::AlreadyShared(_) => "was already shared",
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareLink {
    pub(crate) url: String,
}
