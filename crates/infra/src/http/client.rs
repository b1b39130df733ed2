use std::fmt;
use std::time::Duration;

use gradebridge_domain::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use gradebridge_domain::{GradeBridgeError, Result, TransportError};
use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Identity, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::conversions::{sanitize, status_message};

/// HTTP client with a transport-level timeout and an optional TLS client
/// identity.
///
/// Requests are sent exactly once. Every failure leaves this type as a
/// sanitized [`TransportError`].
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient").finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the request once. Non-2xx answers are failures carrying the
    /// status code.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(sanitize)?;

        let method = request.method().clone();
        let path = request.url().path().to_owned();
        debug!(%method, %path, "sending HTTP request");

        let response = self.client.execute(request).await.map_err(|err| {
            let err = sanitize(err);
            debug!(%method, %path, error = %err, "HTTP request failed");
            err
        })?;

        let status = response.status();
        debug!(%method, %path, %status, "received HTTP response");

        if !status.is_success() {
            return Err(GradeBridgeError::Transport(TransportError::with_status(
                status_message(status),
                status.as_u16(),
            )));
        }

        Ok(response)
    }
}

/// Builder for [`HttpClient`].
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
    identity: Option<Identity>,
    accept_invalid_certs: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: None,
            default_headers: None,
            identity: None,
            accept_invalid_certs: false,
        }
    }
}

impl fmt::Debug for HttpClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClientBuilder")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("identity", &self.identity.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Present `identity` as the TLS client certificate on every connection.
    pub fn identity(mut self, identity: Option<Identity>) -> Self {
        self.identity = identity;
        self
    }

    /// Test-only helper to allow insecure TLS (e.g., self-signed certs).
    #[cfg(test)]
    pub fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        if let Some(identity) = self.identity {
            // PKCS#12 identities are only understood by the native backend.
            builder = builder.use_native_tls().identity(identity);
        }

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|_| {
            GradeBridgeError::Config("HTTP client could not be initialised".into())
        })?;

        Ok(HttpClient { client })
    }
}
