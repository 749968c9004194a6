//! Asynchronous students API client.

use crate::models::StudentList;
use crate::Result;
use pythonanywhere_core::endpoint::extend_segments;
use pythonanywhere_core::{base_url, AnywhereConfig, Flavor, RequestBody, Transport};
use reqwest::{Method, StatusCode};
use tracing::info;
use url::Url;

/// Client for the `students` API.
#[derive(Debug, Clone)]
pub struct StudentsClient {
    transport: Transport,
    base_url: Url,
}

impl StudentsClient {
    /// Create a client for the teacher account described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be built.
    pub fn new(config: &AnywhereConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
            base_url: base_url(config, Flavor::Students)?,
        })
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List the students of the account.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn get(&self) -> Result<StudentList> {
        self.transport
            .call(Method::GET, self.base_url.clone(), RequestBody::Empty)
            .await?
            .expect(&[StatusCode::OK], "GET to list students")?
            .json()
    }

    /// Remove `username` from the account's students.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 204.
    pub async fn delete(&self, username: &str) -> Result<()> {
        info!(student = username, "Removing student via API");
        let url = extend_segments(&self.base_url, [username])?;
        self.transport
            .call(Method::DELETE, url, RequestBody::Empty)
            .await?
            .expect(
                &[StatusCode::NO_CONTENT],
                format!("DELETE to remove student '{username}'"),
            )?;
        Ok(())
    }
}
