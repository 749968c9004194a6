//! Asynchronous files API client.

use crate::models::{DirectoryEntry, PathContents, ShareLink, ShareOutcome, WriteOutcome};
use crate::Result;
use bytes::Bytes;
use pythonanywhere_core::endpoint::{extend, extend_file_path, extend_with_path_query};
use pythonanywhere_core::{
    base_url, site_root, AnywhereConfig, Error, Flavor, Payload, RequestBody, Transport,
};
use reqwest::{Method, StatusCode};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::debug;
use url::Url;

const UPLOAD_FIELD: &str = "content";

/// Client for the `files` API.
#[derive(Debug, Clone)]
pub struct FilesClient {
    transport: Transport,
    base_url: Url,
    site_root: Url,
}

impl FilesClient {
    /// Create a client for the account described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be built.
    pub fn new(config: &AnywhereConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
            base_url: base_url(config, Flavor::Files)?,
            site_root: site_root(config)?,
        })
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the contents at an absolute `path`.
    ///
    /// Directories come back as a listing, files as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn path_get(&self, path: &str) -> Result<PathContents> {
        let url = self.path_url(path)?;
        let context = format!("GET to fetch contents of {url}");
        let response = self
            .transport
            .call(Method::GET, url, RequestBody::Empty)
            .await?
            .expect(&[StatusCode::OK], context)?;

        match response.into_payload()? {
            Payload::Json(value) => {
                let listing: BTreeMap<String, DirectoryEntry> = serde_json::from_value(value)?;
                Ok(PathContents::Directory(listing))
            }
            Payload::Bytes(bytes) => Ok(PathContents::File(bytes)),
        }
    }

    /// Upload `content` to the absolute path `dest`.
    ///
    /// Missing parent directories are created by the API.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200 or 201.
    pub async fn path_post(&self, dest: &str, content: impl Into<Bytes>) -> Result<WriteOutcome> {
        let url = self.path_url(dest)?;
        let context = format!("POST to upload contents to {url}");
        let body = RequestBody::File {
            field: UPLOAD_FIELD.to_string(),
            content: content.into(),
        };
        let response = self
            .transport
            .call(Method::POST, url, body)
            .await?
            .expect(&[StatusCode::OK, StatusCode::CREATED], context)?;

        if response.status() == StatusCode::CREATED {
            Ok(WriteOutcome::Created)
        } else {
            Ok(WriteOutcome::Updated)
        }
    }

    /// Delete the file or directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 204.
    pub async fn path_delete(&self, path: &str) -> Result<()> {
        let url = self.path_url(path)?;
        let context = format!("DELETE on {url}");
        self.transport
            .call(Method::DELETE, url, RequestBody::Empty)
            .await?
            .expect(&[StatusCode::NO_CONTENT], context)?;
        Ok(())
    }

    /// Start sharing the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200 or 201.
    pub async fn sharing_post(&self, path: &str) -> Result<ShareOutcome> {
        let url = extend(&self.base_url, "sharing/")?;
        let context = format!("POST to {url} to share '{path}'");
        let response = self
            .transport
            .call(Method::POST, url, RequestBody::Json(json!({ "path": path })))
            .await?
            .expect(&[StatusCode::OK, StatusCode::CREATED], context)?;

        let link: ShareLink = response.json()?;
        let share_url = self.absolute_share_url(&link.url)?;
        if response.status() == StatusCode::CREATED {
            Ok(ShareOutcome::Shared(share_url))
        } else {
            Ok(ShareOutcome::AlreadyShared(share_url))
        }
    }

    /// Share link for `path`, or `None` if it is not shared.
    ///
    /// # Errors
    ///
    /// Returns an error for any status other than 200 or 404.
    pub async fn sharing_get(&self, path: &str) -> Result<Option<Url>> {
        let url = extend_with_path_query(&self.base_url, "sharing/", path)?;
        let response = self
            .transport
            .call(Method::GET, url, RequestBody::Empty)
            .await?;

        match response.status() {
            StatusCode::OK => {
                let link: ShareLink = response.json()?;
                self.absolute_share_url(&link.url).map(Some)
            }
            StatusCode::NOT_FOUND => {
                debug!(path, "File is not shared");
                Ok(None)
            }
            _ => Err(response.into_error(format!("GET sharing status of '{path}'"))),
        }
    }

    /// Stop sharing the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 204.
    pub async fn sharing_delete(&self, path: &str) -> Result<()> {
        let url = extend_with_path_query(&self.base_url, "sharing/", path)?;
        self.transport
            .call(Method::DELETE, url, RequestBody::Empty)
            .await?
            .expect(&[StatusCode::NO_CONTENT], format!("DELETE to unshare '{path}'"))?;
        Ok(())
    }

    /// Absolute paths of the files and subdirectories under `path`.
    ///
    /// Directories end with `/`. The API caps the listing at 1000 entries.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn tree_get(&self, path: &str) -> Result<Vec<String>> {
        let url = extend_with_path_query(&self.base_url, "tree/", path)?;
        let context = format!("GET to {url}");
        self.transport
            .call(Method::GET, url, RequestBody::Empty)
            .await?
            .expect(&[StatusCode::OK], context)?
            .json()
    }

    fn path_url(&self, path: &str) -> Result<Url> {
        extend_file_path(&self.base_url, "path", path)
    }

    fn absolute_share_url(&self, link: &str) -> Result<Url> {
        self.site_root
            .join(link)
            .map_err(|err| Error::ParseError(format!("Invalid share link `{link}`: {err}")))
    }
}
