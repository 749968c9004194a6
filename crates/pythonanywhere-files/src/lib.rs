//! Files API client for PythonAnywhere.
//!
//! Reads, uploads and deletes files in the account's storage, manages share
//! links and lists directory trees.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::FilesClient;
pub use models::{DirectoryEntry, EntryKind, PathContents, ShareOutcome, WriteOutcome};

/// Convenient result alias that reuses the shared PythonAnywhere error type.
pub type Result<T> = pythonanywhere_core::Result<T>;
