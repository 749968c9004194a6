//! Websites API client for PythonAnywhere.
//!
//! Websites are command-based (ASGI and similar) sites served from the v1
//! API, as opposed to the WSGI web apps of `pythonanywhere-webapp`.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::WebsiteClient;
pub use models::{Website, WebsiteApp, WebsiteDomain, WebsiteLogFiles};

/// Convenient result alias that reuses the shared PythonAnywhere error type.
pub type Result<T> = pythonanywhere_core::Result<T>;
