//! Asynchronous web app API client.

use crate::logs::{log_file_suffix, LogFiles, LogKind, LOG_DIRECTORY};
use crate::models::{PythonVersion, StaticFileMapping, Webapp, WebappPatch};
use crate::Result;
use pythonanywhere_core::classify::{extract_detail, is_cname_error};
use pythonanywhere_core::endpoint::{
    extend, extend_file_path, extend_segments, extend_with_path_query,
};
use pythonanywhere_core::{
    base_url, AnywhereConfig, ApiResponse, Error, Flavor, RequestBody, SslInfo, Transport,
    MISSING_TOKEN_MESSAGE,
};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Static file mappings added by [`WebappClient::add_default_static_files_mappings`].
pub const DEFAULT_STATIC_MAPPINGS: [(&str, &str); 2] = [("/static/", "static"), ("/media/", "media")];

/// Client for a single web app, identified by its domain.
#[derive(Debug, Clone)]
pub struct WebappClient {
    transport: Transport,
    webapps_url: Url,
    files_url: Url,
    domain: String,
    domain_url: Url,
}

impl WebappClient {
    /// Create a client for the web app served on `domain`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints cannot be built.
    pub fn new(config: &AnywhereConfig, domain: impl Into<String>) -> Result<Self> {
        let domain = domain.into();
        let webapps_url = base_url(config, Flavor::Webapps)?;
        let domain_url = extend_segments(&webapps_url, [domain.as_str(), ""])?;

        Ok(Self {
            transport: Transport::new(config)?,
            files_url: base_url(config, Flavor::Files)?,
            webapps_url,
            domain,
            domain_url,
        })
    }

    /// Domain of the web app.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// URL of the web app resource.
    #[must_use]
    pub fn domain_url(&self) -> &Url {
        &self.domain_url
    }

    /// Check that a web app can be created.
    ///
    /// Fails if no token is configured, and unless `nuke` is set, if a web
    /// app already exists for the domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sanity`] when a check fails.
    pub async fn sanity_checks(&self, nuke: bool) -> Result<()> {
        info!(domain = %self.domain, "Running API sanity checks");

        if !self.transport.config().has_token() {
            return Err(Error::Sanity(MISSING_TOKEN_MESSAGE.to_string()));
        }

        if nuke {
            return Ok(());
        }

        let response = self
            .transport
            .call(Method::GET, self.domain_url.clone(), RequestBody::Empty)
            .await?;
        if response.status() == StatusCode::OK {
            return Err(Error::Sanity(format!(
                "You already have a webapp for {}.\n\nUse the --nuke option if you want to replace it.",
                self.domain
            )));
        }

        Ok(())
    }

    /// Create the web app and point it at a virtualenv and project directory.
    ///
    /// With `nuke`, any existing web app for the domain is deleted first.
    /// Steps run in order and a failure leaves earlier steps in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] for an unsupported Python version,
    /// or the failure of the first step that does not succeed.
    pub async fn create(
        &self,
        python_version: &str,
        virtualenv_path: &Path,
        project_path: &Path,
        nuke: bool,
    ) -> Result<()> {
        let version: PythonVersion = python_version.parse()?;
        info!(domain = %self.domain, %version, "Creating web app via API");

        if nuke {
            self.delete_existing().await?;
        }

        let form = vec![
            ("domain_name".to_string(), self.domain.clone()),
            ("python_version".to_string(), version.api_name().to_string()),
        ];
        let response = self
            .transport
            .call(Method::POST, self.webapps_url.clone(), RequestBody::Form(form))
            .await?;
        check_created(&response)?;

        let form = vec![
            (
                "virtualenv_path".to_string(),
                virtualenv_path.display().to_string(),
            ),
            (
                "source_directory".to_string(),
                project_path.display().to_string(),
            ),
        ];
        self.transport
            .call(Method::PATCH, self.domain_url.clone(), RequestBody::Form(form))
            .await?
            .expect(
                &[StatusCode::OK],
                "PATCH to set virtualenv path and source directory via API",
            )?;

        Ok(())
    }

    /// Fetch the web app.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn get(&self) -> Result<Webapp> {
        self.transport
            .call(Method::GET, self.domain_url.clone(), RequestBody::Empty)
            .await?
            .expect(&[StatusCode::OK], "GET webapp via API")?
            .json()
    }

    /// List every web app of the account.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn list(&self) -> Result<Vec<Webapp>> {
        self.transport
            .call(Method::GET, self.webapps_url.clone(), RequestBody::Empty)
            .await?
            .expect(&[StatusCode::OK], "GET webapps via API")?
            .json()
    }

    /// Change web app settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] for an empty patch, or an error
    /// unless the API answers 200.
    pub async fn patch(&self, patch: &WebappPatch) -> Result<Webapp> {
        if patch.is_empty() {
            return Err(Error::InvalidRequest(
                "Webapp update has no fields set".to_string(),
            ));
        }

        self.transport
            .call(
                Method::PATCH,
                self.domain_url.clone(),
                RequestBody::Form(patch.to_pairs()),
            )
            .await?
            .expect(&[StatusCode::OK], "PATCH webapp via API")?
            .json()
    }

    /// Delete the web app.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200 or 204.
    pub async fn delete(&self) -> Result<()> {
        info!(domain = %self.domain, "Deleting web app via API");
        self.transport
            .call(Method::DELETE, self.domain_url.clone(), RequestBody::Empty)
            .await?
            .expect(
                &[StatusCode::OK, StatusCode::NO_CONTENT],
                "DELETE webapp via API",
            )?;
        Ok(())
    }

    /// Serve `<project>/static` under `/static/` and `<project>/media` under `/media/`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 201 for each mapping.
    pub async fn add_default_static_files_mappings(&self, project_path: &Path) -> Result<()> {
        info!(domain = %self.domain, "Adding static files mappings for /static/ and /media/");
        let url = extend(&self.domain_url, "static_files/")?;

        for (prefix, directory) in DEFAULT_STATIC_MAPPINGS {
            let mapping = StaticFileMapping {
                url: prefix.to_string(),
                path: project_path.join(directory).display().to_string(),
            };
            let body = RequestBody::Json(serde_json::to_value(&mapping)?);
            self.transport
                .call(Method::POST, url.clone(), body)
                .await?
                .expect(
                    &[StatusCode::CREATED],
                    format!("POST to add static files mapping for {prefix} via API"),
                )?;
        }

        Ok(())
    }

    /// Reload the web app.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCname`] when the domain has no CNAME pointing
    /// at PythonAnywhere. The reload itself is not blocked by that, see
    /// [`Error::is_recoverable`].
    pub async fn reload(&self) -> Result<()> {
        info!(domain = %self.domain, "Reloading web app via API");
        let url = extend(&self.domain_url, "reload/")?;
        let response = self
            .transport
            .call(Method::POST, url, RequestBody::Empty)
            .await?;

        if response.status() == StatusCode::OK {
            return Ok(());
        }
        if is_cname_error(&response) {
            info!(domain = %self.domain, "Reload reported a missing CNAME");
            return Err(Error::MissingCname);
        }
        Err(response.into_error("POST to reload webapp via API"))
    }

    /// Install a TLS certificate and its private key.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn set_ssl(&self, certificate: &str, private_key: &str) -> Result<()> {
        info!(domain = %self.domain, "Setting up SSL via API");
        let url = extend(&self.domain_url, "ssl/")?;
        let body = json!({ "cert": certificate, "private_key": private_key });
        self.transport
            .call(Method::POST, url, RequestBody::Json(body))
            .await?
            .expect(&[StatusCode::OK], "POST to set SSL details via API")?;
        Ok(())
    }

    /// Fetch details of the installed certificate.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200 with a parseable expiry.
    pub async fn get_ssl_info(&self) -> Result<SslInfo> {
        let url = extend(&self.domain_url, "ssl/")?;
        self.transport
            .call(Method::GET, url, RequestBody::Empty)
            .await?
            .expect(&[StatusCode::OK], "GET SSL details via API")?
            .json()
    }

    /// Delete a log file. Index 0 is the current file, higher indices are archives.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 204.
    pub async fn delete_log(&self, kind: LogKind, index: u32) -> Result<()> {
        if index == 0 {
            info!(domain = %self.domain, %kind, "Deleting current log file via API");
        } else {
            info!(domain = %self.domain, %kind, index, "Deleting archived log file via API");
        }

        let suffix = log_file_suffix(index);
        let url = extend_file_path(
            &self.files_url,
            "path",
            &format!("{LOG_DIRECTORY}{}.{kind}.log{suffix}/", self.domain),
        )?;
        self.transport
            .call(Method::DELETE, url, RequestBody::Empty)
            .await?
            .expect(&[StatusCode::NO_CONTENT], "DELETE log file via API")?;
        Ok(())
    }

    /// List the log files present for the web app.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn get_log_info(&self) -> Result<LogFiles> {
        let url = extend_with_path_query(&self.files_url, "tree/", LOG_DIRECTORY)?;
        let listing: Vec<Value> = self
            .transport
            .call(Method::GET, url, RequestBody::Empty)
            .await?
            .expect(&[StatusCode::OK], "GET log files info via API")?
            .json()?;

        Ok(LogFiles::from_listing(
            &self.domain,
            listing.iter().filter_map(Value::as_str),
        ))
    }

    async fn delete_existing(&self) -> Result<()> {
        let response = self
            .transport
            .call(Method::DELETE, self.domain_url.clone(), RequestBody::Empty)
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => {
                debug!(domain = %self.domain, "No existing web app to delete");
                Ok(())
            }
            _ => Err(response.into_error("DELETE to remove existing webapp via API")),
        }
    }
}

fn check_created(response: &ApiResponse) -> Result<()> {
    let reported_error = response
        .json_value()
        .filter(|body| body.get("status").and_then(Value::as_str) == Some("ERROR"));

    if response.status() == StatusCode::CREATED && reported_error.is_none() {
        return Ok(());
    }

    let detail = reported_error
        .as_ref()
        .and_then(|body| body.get("error_message"))
        .and_then(Value::as_str)
        .map_or_else(|| extract_detail(response), str::to_string);

    Err(Error::Api {
        status: response.status().as_u16(),
        context: "POST to create webapp via API".to_string(),
        detail,
    })
}
