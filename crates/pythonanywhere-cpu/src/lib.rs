//! CPU quota API client for PythonAnywhere.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::CpuClient;
pub use models::CpuUsage;

/// Convenient result alias that reuses the shared PythonAnywhere error type.
pub type Result<T> = pythonanywhere_core::Result<T>;
