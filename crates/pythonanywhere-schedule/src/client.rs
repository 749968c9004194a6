//! Asynchronous scheduled tasks API client.

use crate::models::{Task, TaskParams, TaskUpdate};
use crate::Result;
use pythonanywhere_core::endpoint::extend;
use pythonanywhere_core::{base_url, AnywhereConfig, Flavor, RequestBody, Transport};
use reqwest::{Method, StatusCode};
use tracing::info;
use url::Url;

/// Client for the `schedule` API.
#[derive(Debug, Clone)]
pub struct ScheduleClient {
    transport: Transport,
    base_url: Url,
}

impl ScheduleClient {
    /// Create a client for the account described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be built.
    pub fn new(config: &AnywhereConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
            base_url: base_url(config, Flavor::Schedule)?,
        })
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Create a task.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 201.
    pub async fn create(&self, params: &TaskParams) -> Result<Task> {
        info!(interval = %params.interval, "Creating scheduled task via API");
        let body = RequestBody::Json(serde_json::to_value(params)?);
        self.transport
            .call(Method::POST, self.base_url.clone(), body)
            .await?
            .expect(&[StatusCode::CREATED], "POST to set new task via API")?
            .json()
    }

    /// Delete task `id`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 204.
    pub async fn delete(&self, id: u64) -> Result<()> {
        info!(id, "Deleting scheduled task via API");
        self.transport
            .call(Method::DELETE, self.task_url(id)?, RequestBody::Empty)
            .await?
            .expect(&[StatusCode::NO_CONTENT], format!("DELETE via API on task {id}"))?;
        Ok(())
    }

    /// Fetch task `id`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn get_specs(&self, id: u64) -> Result<Task> {
        self.transport
            .call(Method::GET, self.task_url(id)?, RequestBody::Empty)
            .await?
            .expect(&[StatusCode::OK], format!("GET task with id {id}"))?
            .json()
    }

    /// List every task of the account.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn get_list(&self) -> Result<Vec<Task>> {
        self.transport
            .call(Method::GET, self.base_url.clone(), RequestBody::Empty)
            .await?
            .expect(&[StatusCode::OK], "GET list of tasks via API")?
            .json()
    }

    /// Change fields of task `id`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn update(&self, id: u64, update: &TaskUpdate) -> Result<Task> {
        info!(id, "Updating scheduled task via API");
        let body = RequestBody::Json(serde_json::to_value(update)?);
        self.transport
            .call(Method::PATCH, self.task_url(id)?, body)
            .await?
            .expect(&[StatusCode::OK], format!("PATCH to update task {id}"))?
            .json()
    }

    fn task_url(&self, id: u64) -> Result<Url> {
        extend(&self.base_url, &format!("{id}/"))
    }
}
