//! Students API client for PythonAnywhere teacher accounts.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::StudentsClient;
pub use models::{Student, StudentList};

/// Convenient result alias that reuses the shared PythonAnywhere error type.
pub type Result<T> = pythonanywhere_core::Result<T>;
