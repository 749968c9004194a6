//! # pythonanywhere-core
//!
//! Core configuration, transport and error types for the PythonAnywhere API.
//!
//! The resource crates (`pythonanywhere-files`, `pythonanywhere-webapp`,
//! `pythonanywhere-website`, `pythonanywhere-schedule`,
//! `pythonanywhere-students` and `pythonanywhere-cpu`) are all built on the
//! pieces in this crate.
//!
//! ## Modules
//!
//! - [`config`] - Account, host and credential configuration
//! - [`endpoint`] - Resource flavors and base URL resolution
//! - [`transport`] - Authorized HTTP calls with default headers
//! - [`response`] - Fully-read responses and status expectations
//! - [`classify`] - Mapping of error responses onto [`Error`]
//! - [`types`] - Data types shared by several resource families
//! - [`error`] - Error types

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod response;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use config::AnywhereConfig;
pub use endpoint::{base_url, site_root, ApiVersion, Flavor};
pub use error::{Error, Result, MISSING_TOKEN_MESSAGE};
pub use response::{ApiResponse, Payload};
pub use transport::{compose_user_agent, RequestBody, Transport};
pub use types::SslInfo;

