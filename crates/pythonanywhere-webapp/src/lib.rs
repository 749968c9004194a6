//! Web app API client for PythonAnywhere.
//!
//! Covers the WSGI web app lifecycle: sanity checks, creation with an
//! optional replace, static file mappings, reloads, TLS certificates and the
//! web app's log files.

#![deny(missing_docs)]

pub mod client;
pub mod logs;
pub mod models;

pub use client::WebappClient;
pub use logs::{log_file_suffix, parse_log_file_name, LogFiles, LogKind};
pub use models::{PythonVersion, StaticFileMapping, Webapp, WebappPatch};

/// Convenient result alias that reuses the shared PythonAnywhere error type.
pub type Result<T> = pythonanywhere_core::Result<T>;
