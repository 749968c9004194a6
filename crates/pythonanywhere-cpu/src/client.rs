//! Asynchronous CPU quota API client.

use crate::models::CpuUsage;
use crate::Result;
use pythonanywhere_core::{base_url, AnywhereConfig, Flavor, RequestBody, Transport};
use reqwest::{Method, StatusCode};
use url::Url;

/// Client for the `cpu` API.
#[derive(Debug, Clone)]
pub struct CpuClient {
    transport: Transport,
    base_url: Url,
}

impl CpuClient {
    /// Create a client for the account described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be built.
    pub fn new(config: &AnywhereConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
            base_url: base_url(config, Flavor::Cpu)?,
        })
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the current CPU usage.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn get_cpu_usage(&self) -> Result<CpuUsage> {
        let context = format!("GET to {}", self.base_url);
        self.transport
            .call(Method::GET, self.base_url.clone(), RequestBody::Empty)
            .await?
            .expect(&[StatusCode::OK], context)?
            .json()
    }
}
