//! Asynchronous websites API client.

use crate::models::Website;
use crate::Result;
use pythonanywhere_core::classify::{is_cname_error, is_domain_conflict};
use pythonanywhere_core::endpoint::{extend, extend_segments};
use pythonanywhere_core::{
    base_url, AnywhereConfig, Error, Flavor, RequestBody, SslInfo, Transport,
    MISSING_TOKEN_MESSAGE,
};
use reqwest::{Method, StatusCode};
use serde_json::json;
use tracing::{debug, info};
use url::Url;

const AUTO_RENEW_CERT_TYPE: &str = "letsencrypt-auto-renew";

/// Client for the `websites` API.
#[derive(Debug, Clone)]
pub struct WebsiteClient {
    transport: Transport,
    base_url: Url,
}

impl WebsiteClient {
    /// Create a client for the account described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be built.
    pub fn new(config: &AnywhereConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
            base_url: base_url(config, Flavor::Websites)?,
        })
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Check that a website can be created for `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sanity`] if no token is configured, or unless `nuke`
    /// is set, if a website already exists for the domain.
    pub async fn sanity_checks(&self, domain: &str, nuke: bool) -> Result<()> {
        info!(domain, "Running API sanity checks");

        if !self.transport.config().has_token() {
            return Err(Error::Sanity(MISSING_TOKEN_MESSAGE.to_string()));
        }

        if nuke {
            return Ok(());
        }

        let response = self
            .transport
            .call(Method::GET, self.domain_url(domain)?, RequestBody::Empty)
            .await?;
        if response.status() == StatusCode::OK {
            return Err(Error::Sanity(format!(
                "You already have a website for {domain}.\n\nUse the --nuke option if you want to replace it."
            )));
        }

        Ok(())
    }

    /// Create a website serving `domain` with `command`.
    ///
    /// With `nuke`, an existing website for the domain is deleted first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DomainAlreadyExists`] when the API reports the domain
    /// as taken, or an error unless the API answers 201.
    pub async fn create(&self, domain: &str, command: &str, nuke: bool) -> Result<Website> {
        info!(domain, "Creating website via API");

        if nuke {
            self.delete_existing(domain).await?;
        }

        let body = json!({
            "domain_name": domain,
            "enabled": true,
            "webapp": { "command": command },
        });
        let response = self
            .transport
            .call(Method::POST, self.base_url.clone(), RequestBody::Json(body))
            .await?;

        if is_domain_conflict(&response) {
            return Err(Error::DomainAlreadyExists(domain.to_string()));
        }

        response
            .expect(&[StatusCode::CREATED], "POST to create website via API")?
            .json()
    }

    /// Fetch the website serving `domain`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn get(&self, domain: &str) -> Result<Website> {
        self.transport
            .call(Method::GET, self.domain_url(domain)?, RequestBody::Empty)
            .await?
            .expect(&[StatusCode::OK], "GET website via API")?
            .json()
    }

    /// List every website of the account.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn list(&self) -> Result<Vec<Website>> {
        self.transport
            .call(Method::GET, self.base_url.clone(), RequestBody::Empty)
            .await?
            .expect(&[StatusCode::OK], "GET websites via API")?
            .json()
    }

    /// Reload the website serving `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCname`] when the domain has no CNAME pointing
    /// at PythonAnywhere, or an error unless the API answers 200.
    pub async fn reload(&self, domain: &str) -> Result<()> {
        info!(domain, "Reloading website via API");
        let url = extend(&self.domain_url(domain)?, "reload/")?;
        let response = self
            .transport
            .call(Method::POST, url, RequestBody::Empty)
            .await?;

        if response.status() == StatusCode::OK {
            return Ok(());
        }
        if is_cname_error(&response) {
            return Err(Error::MissingCname);
        }
        Err(response.into_error("POST to reload website via API"))
    }

    /// Delete the website serving `domain`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 204.
    pub async fn delete(&self, domain: &str) -> Result<()> {
        info!(domain, "Deleting website via API");
        self.transport
            .call(Method::DELETE, self.domain_url(domain)?, RequestBody::Empty)
            .await?
            .expect(&[StatusCode::NO_CONTENT], "DELETE website via API")?;
        Ok(())
    }

    /// Switch the website to an automatically renewed Let's Encrypt certificate.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn auto_ssl(&self, domain: &str) -> Result<()> {
        info!(domain, "Enabling automatic SSL via API");
        let body = json!({ "cert_type": AUTO_RENEW_CERT_TYPE });
        self.transport
            .call(Method::POST, self.ssl_url(domain)?, RequestBody::Json(body))
            .await?
            .expect(&[StatusCode::OK], "POST to enable automatic SSL via API")?;
        Ok(())
    }

    /// Install a TLS certificate and its private key for `domain`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn set_ssl(&self, domain: &str, certificate: &str, private_key: &str) -> Result<()> {
        info!(domain, "Setting up SSL via API");
        let body = json!({ "cert": certificate, "private_key": private_key });
        self.transport
            .call(Method::POST, self.ssl_url(domain)?, RequestBody::Json(body))
            .await?
            .expect(&[StatusCode::OK], "POST to set SSL details via API")?;
        Ok(())
    }

    /// Fetch details of the certificate installed for `domain`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API answers 200.
    pub async fn get_ssl_info(&self, domain: &str) -> Result<SslInfo> {
        self.transport
            .call(Method::GET, self.ssl_url(domain)?, RequestBody::Empty)
            .await?
            .expect(&[StatusCode::OK], "GET SSL details via API")?
            .json()
    }

    async fn delete_existing(&self, domain: &str) -> Result<()> {
        let response = self
            .transport
            .call(Method::DELETE, self.domain_url(domain)?, RequestBody::Empty)
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => {
                debug!(domain, "No existing website to delete");
                Ok(())
            }
            _ => Err(response.into_error("DELETE to remove existing website via API")),
        }
    }

    fn domain_url(&self, domain: &str) -> Result<Url> {
        extend_segments(&self.base_url, [domain, ""])
    }

    fn ssl_url(&self, domain: &str) -> Result<Url> {
        extend_segments(&self.base_url, [domain, "ssl", ""])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const WEBSITES: &str = "/api/v1/user/bill/websites";
    const DOMAIN: &str = "foo.bar.com";
    const COMMAND: &str = "/usr/local/bin/uvicorn --uds $DOMAIN_SOCKET main:app";

    fn test_client(server: &MockServer) -> WebsiteClient {
        let config = AnywhereConfig::new("bill")
            .unwrap()
            .with_token("sekrit.token")
            .with_site(server.address().to_string())
            .with_scheme("http");
        WebsiteClient::new(&config).unwrap()
    }

    fn website_info() -> serde_json::Value {
        json!({
            "domain_name": DOMAIN,
            "enabled": true,
            "id": 42,
            "user": "bill",
            "webapp": {
                "command": COMMAND,
                "domains": [{"domain_name": DOMAIN, "enabled": true}],
                "id": 42
            }
        })
    }

    #[tokio::test]
    async fn create_posts_json_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{WEBSITES}/").as_str()))
            .and(body_json(json!({
                "domain_name": DOMAIN,
                "enabled": true,
                "webapp": {"command": COMMAND}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(website_info()))
            .expect(1)
            .mount(&server)
            .await;

        let website = test_client(&server)
            .create(DOMAIN, COMMAND, false)
            .await
            .unwrap();
        assert_eq!(website.domain_name, DOMAIN);
        assert_eq!(website.id, Some(42));
    }

    #[tokio::test]
    async fn create_reports_existing_domain() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{WEBSITES}/").as_str()))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "domain_name": ["domain with this domain name already exists."]
            })))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .create(DOMAIN, COMMAND, false)
            .await
            .unwrap_err();
        assert_eq!(err, Error::DomainAlreadyExists(DOMAIN.to_string()));
    }

    #[tokio::test]
    async fn create_reports_other_bad_requests_generically() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{WEBSITES}/").as_str()))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"detail": "command is required"})),
            )
            .mount(&server)
            .await;

        let err = test_client(&server)
            .create(DOMAIN, "", false)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "POST to create website via API failed, got 400: command is required"
        );
    }

    #[tokio::test]
    async fn create_with_nuke_deletes_first() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(format!("{WEBSITES}/{DOMAIN}/").as_str()))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{WEBSITES}/").as_str()))
            .respond_with(ResponseTemplate::new(201).set_body_json(website_info()))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server)
            .create(DOMAIN, COMMAND, true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn sanity_checks_detect_existing_website() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{WEBSITES}/{DOMAIN}/").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(website_info()))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.sanity_checks(DOMAIN, false).await.unwrap_err();
        assert!(matches!(err, Error::Sanity(_)));
        client.sanity_checks(DOMAIN, true).await.unwrap();
    }

    #[tokio::test]
    async fn sanity_checks_require_token() {
        let server = MockServer::start().await;
        let config = AnywhereConfig::new("bill")
            .unwrap()
            .with_site(server.address().to_string())
            .with_scheme("http");
        let client = WebsiteClient::new(&config).unwrap();

        let err = client.sanity_checks(DOMAIN, false).await.unwrap_err();
        assert_eq!(err, Error::Sanity(MISSING_TOKEN_MESSAGE.to_string()));
        assert!(err
            .to_string()
            .contains("close this console and open a new one"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_and_list_websites() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{WEBSITES}/{DOMAIN}/").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(website_info()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{WEBSITES}/").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([website_info()])))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let website = client.get(DOMAIN).await.unwrap();
        assert_eq!(
            website.webapp.as_ref().map(|app| app.command.as_str()),
            Some(COMMAND)
        );
        assert_eq!(client.list().await.unwrap(), vec![website]);
    }

    #[tokio::test]
    async fn reload_maps_cname_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{WEBSITES}/{DOMAIN}/reload/").as_str()))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({"error": "cname_error"})))
            .mount(&server)
            .await;

        let err = test_client(&server).reload(DOMAIN).await.unwrap_err();
        assert_eq!(err, Error::MissingCname);
    }

    #[tokio::test]
    async fn reload_succeeds_on_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{WEBSITES}/{DOMAIN}/reload/").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK"})))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server).reload(DOMAIN).await.unwrap();
    }

    #[tokio::test]
    async fn delete_expects_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(format!("{WEBSITES}/{DOMAIN}/").as_str()))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server).delete(DOMAIN).await.unwrap();
    }

    #[tokio::test]
    async fn auto_ssl_requests_letsencrypt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{WEBSITES}/{DOMAIN}/ssl/").as_str()))
            .and(body_json(json!({"cert_type": "letsencrypt-auto-renew"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK"})))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server).auto_ssl(DOMAIN).await.unwrap();
    }

    #[tokio::test]
    async fn set_ssl_posts_certificate_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{WEBSITES}/{DOMAIN}/ssl/").as_str()))
            .and(body_json(json!({"cert": "cert", "private_key": "key"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server)
            .set_ssl(DOMAIN, "cert", "key")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn get_ssl_info_includes_body_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{WEBSITES}/{DOMAIN}/ssl/").as_str()))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .mount(&server)
            .await;

        let err = test_client(&server).get_ssl_info(DOMAIN).await.unwrap_err();
        assert!(err.to_string().contains("GET SSL details via API failed, got"));
        assert!(err.to_string().contains("nope"));
    }

    #[tokio::test]
    async fn get_ssl_info_parses_certificate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{WEBSITES}/{DOMAIN}/ssl/").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "not_after": "2025-08-24T17:16:23Z",
                "cert_type": "letsencrypt-auto-renew"
            })))
            .mount(&server)
            .await;

        let info = test_client(&server).get_ssl_info(DOMAIN).await.unwrap();
        assert_eq!(info.cert_type.as_deref(), Some("letsencrypt-auto-renew"));
        assert_eq!(info.not_after.to_rfc3339(), "2025-08-24T17:16:23+00:00");
    }
}
