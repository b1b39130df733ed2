use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use gradebridge_domain::constants::{
    CATALOG_ENDPOINT_PREFIX, CATALOG_MEDIA_TYPE, DEFAULT_MEDIA_TYPE,
};
use gradebridge_domain::{GradeBridgeError, RegistryConfig, Result};
use reqwest::header::ACCEPT;
use reqwest::{Identity, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::conversions::sanitize;
use crate::http::HttpClient;

/// Authenticated client for the registry REST API.
///
/// Built once per process from [`RegistryConfig`] and cloned into every
/// caller. Holds no per-request state.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: HttpClient,
    base_url: Arc<str>,
}

impl RegistryClient {
    /// Build the client, loading the PKCS#12 client identity when configured.
    ///
    /// # Errors
    /// Returns `GradeBridgeError::Config` when the certificate bundle is not
    /// valid base64, cannot be opened with the passphrase, or the TLS backend
    /// rejects it.
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let identity = config
            .pfx_base64
            .as_deref()
            .map(|encoded| load_identity(encoded, &config.pfx_passphrase))
            .transpose()?;

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("gradebridge/", env!("CARGO_PKG_VERSION")))
            .identity(identity)
            .build()?;

        Ok(Self::with_http(&config.base_url, http))
    }

    /// Wrap an already configured transport.
    pub fn with_http(base_url: &str, http: HttpClient) -> Self {
        Self { http, base_url: Arc::from(base_url.trim_end_matches('/')) }
    }

    /// GET `endpoint` and decode the JSON body.
    ///
    /// # Errors
    /// `Transport` for network failures and non-2xx answers,
    /// `InvalidResponse` when the body does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let builder = self
            .http
            .request(Method::GET, self.url(endpoint))
            .header(ACCEPT, accept_for(endpoint));

        let response = self.http.send(builder).await?;
        decode(endpoint, response).await
    }

    /// Send `body` as JSON to `endpoint` with `method` and decode the answer.
    ///
    /// # Errors
    /// Same as [`RegistryClient::get`].
    pub async fn request<B, T>(&self, endpoint: &str, method: Method, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .http
            .request(method, self.url(endpoint))
            .header(ACCEPT, accept_for(endpoint))
            .json(body);

        let response = self.http.send(builder).await?;
        decode(endpoint, response).await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }
}

fn load_identity(encoded: &str, passphrase: &str) -> Result<Identity> {
    let der = STANDARD.decode(encoded.trim()).map_err(|_| {
        GradeBridgeError::Config("registry client certificate is not valid base64".into())
    })?;

    Identity::from_pkcs12_der(&der, passphrase).map_err(|_| {
        GradeBridgeError::Config("registry client certificate could not be loaded".into())
    })
}

/// Media type to negotiate for `endpoint`.
pub(crate) fn accept_for(endpoint: &str) -> &'static str {
    if endpoint.starts_with(CATALOG_ENDPOINT_PREFIX) {
        CATALOG_MEDIA_TYPE
    } else {
        DEFAULT_MEDIA_TYPE
    }
}

async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T> {
    let bytes = response.bytes().await.map_err(sanitize)?;
    debug!(endpoint, bytes = bytes.len(), "registry response received");

    let parsed = if bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_slice(&bytes)
    };

    parsed.map_err(|err| {
        GradeBridgeError::InvalidResponse(format!(
            "registry response from {endpoint} could not be decoded: {err}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> RegistryClient {
        RegistryClient::new(&RegistryConfig {
            base_url: format!("{}/", server.uri()),
            pfx_base64: None,
            pfx_passphrase: String::new(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn catalog_endpoints_negotiate_catalog_media_type() {
        assert_eq!(accept_for("/kataloginformation/behorighetsprofil"), CATALOG_MEDIA_TYPE);
        assert_eq!(accept_for("/resultat/studieresultat/sok"), DEFAULT_MEDIA_TYPE);
    }

    #[test]
    fn invalid_certificate_bundle_is_a_config_error() {
        let config = RegistryConfig {
            base_url: "https://registry.test".into(),
            pfx_base64: Some("not base64!".into()),
            pfx_passphrase: "pw".into(),
            timeout_secs: 5,
        };
        let err = RegistryClient::new(&config).unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(!err.to_string().contains("pw"));
    }

    #[test]
    fn garbage_pkcs12_is_a_config_error() {
        let config = RegistryConfig {
            base_url: "https://registry.test".into(),
            pfx_base64: Some(STANDARD.encode(b"definitely not der")),
            pfx_passphrase: "pw".into(),
            timeout_secs: 5,
        };
        assert!(matches!(RegistryClient::new(&config), Err(GradeBridgeError::Config(_))));
    }

    #[tokio::test]
    async fn get_sends_catalog_accept_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/kataloginformation/anvandare/autentiserad"))
            .and(header("accept", CATALOG_MEDIA_TYPE))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Uid": "u1" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let body: Value = client.get("/kataloginformation/anvandare/autentiserad").await.unwrap();
        assert_eq!(body["Uid"], "u1");
    }

    #[tokio::test]
    async fn request_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resultat/studieresultat/skapa"))
            .and(header("accept", DEFAULT_MEDIA_TYPE))
            .and(body_json(json!({ "Betygsgrad": 3 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let body: Value = client
            .request("/resultat/studieresultat/skapa", Method::POST, &json!({ "Betygsgrad": 3 }))
            .await
            .unwrap();
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn empty_body_decodes_as_null() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let body: Option<Value> =
            client.request("/resultat/x", Method::PUT, &json!({})).await.unwrap();
        assert_eq!(body, None);
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get::<Value>("/resultat/x").await.unwrap_err();
        assert_eq!(err.kind(), "invalid_response");
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        match client.get::<Value>("/resultat/x").await {
            Err(GradeBridgeError::Transport(err)) => {
                assert_eq!(err.status(), Some(403));
                assert!(!err.message().contains(&server.uri()));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
