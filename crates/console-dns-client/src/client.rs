//! Catalogue service client implementation.

use crate::api::ZonesApi;
use console_dns_core::{ConsoleError, Result};
use reqwest::header::{ACCEPT, ETAG, IF_NONE_MATCH};
use reqwest::{Client as HttpClient, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for one console-dns catalogue service endpoint
#[derive(Clone)]
pub struct ConsoleClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    token: String,
    base_url: String,
    timeout: Duration,
}

/// Body of a conditional GET
#[derive(Debug)]
pub(crate) enum Versioned {
    /// The resource changed; carries the raw body and its `ETag`, if any
    Modified { body: Vec<u8>, etag: Option<String> },
    /// The server answered `304 Not Modified`
    NotModified,
}

impl ConsoleClient {
    /// Create a new client for `server` authenticating with `token`
    pub fn new(server: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        ConsoleClientBuilder::new(server, token).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(server: impl Into<String>, token: impl Into<String>) -> ConsoleClientBuilder {
        ConsoleClientBuilder::new(server, token)
    }

    /// Access zone catalogue endpoints
    #[must_use]
    pub fn zones(&self) -> ZonesApi<'_> {
        ZonesApi::new(self)
    }

    /// Base URL of the service this client talks to
    #[must_use]
    pub fn server(&self) -> &str {
        &self.inner.base_url
    }

    /// Perform a GET, sending `If-None-Match` when a version token is known
    pub(crate) async fn get_versioned(
        &self,
        path: &str,
        if_none_match: Option<&str>,
    ) -> Result<Versioned> {
        let url = self.build_url(path)?;
        debug!(url = %url, if_none_match, "GET request");

        let mut request = self
            .inner
            .http
            .get(url)
            .bearer_auth(&self.inner.token)
            .header(ACCEPT, "application/json");
        if let Some(etag) = if_none_match {
            request = request.header(IF_NONE_MATCH, etag);
        }

        let response = request.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status();

        if status == StatusCode::NOT_MODIFIED {
            return Ok(Versioned::NotModified);
        }
        if !status.is_success() {
            return self.handle_error(status.as_u16(), response).await;
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&e))?;

        Ok(Versioned::Modified {
            body: body.to_vec(),
            etag,
        })
    }

    /// Join the base URL and an absolute API path
    fn build_url(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{}", self.inner.base_url.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| ConsoleError::InvalidUrl(format!("{raw}: {e}")))
    }

    fn transport_error(&self, e: &reqwest::Error) -> ConsoleError {
        if e.is_timeout() {
            ConsoleError::Timeout(self.inner.timeout.as_secs())
        } else if e.is_connect() {
            ConsoleError::Connection(e.to_string())
        } else {
            ConsoleError::Http(e.to_string())
        }
    }

    /// Convert an error response to a `ConsoleError`
    async fn handle_error<T>(&self, status: u16, response: reqwest::Response) -> Result<T> {
        let body = response.text().await.unwrap_or_default();

        // Try to parse error message from JSON
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);

        match status {
            401 | 403 => {
                warn!(server = %self.inner.base_url, "catalogue service rejected the token");
                Err(ConsoleError::Unauthorized)
            }
            _ => Err(ConsoleError::Api {
                code: status,
                message,
            }),
        }
    }
}

/// Builder for configuring a [`ConsoleClient`]
pub struct ConsoleClientBuilder {
    server: String,
    token: String,
    timeout: Duration,
    user_agent: String,
}

impl ConsoleClientBuilder {
    /// Create a new builder for `server` with the given token
    #[must_use]
    pub fn new(server: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("console-dns/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ConsoleClient> {
        Url::parse(&self.server)
            .map_err(|e| ConsoleError::InvalidUrl(format!("{}: {e}", self.server)))?;
        if self.token.is_empty() {
            return Err(ConsoleError::Config("token must not be empty".into()));
        }

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| ConsoleError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(ConsoleClient {
            inner: Arc::new(ClientInner {
                http,
                token: self.token,
                base_url: self.server,
                timeout: self.timeout,
            }),
        })
    }
}
