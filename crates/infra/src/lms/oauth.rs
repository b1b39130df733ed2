//! OAuth2 authorization-code flow against the LMS.
//!
//! Two halves: building the browser redirect to the LMS authorize page, and
//! redeeming the code the LMS sends back for an access token.

use std::time::Duration;

use async_trait::async_trait;
use gradebridge_core::{validate_launch, CredentialExchanger};
use gradebridge_domain::constants::{LMS_AUTHORIZE_PATH, LMS_TOKEN_PATH};
use gradebridge_domain::{
    GradeBridgeError, IdentityClaims, LmsConfig, LtiLaunch, ProxyConfig, RedirectContext, Result,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use url::Url;

use crate::http::HttpClient;

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_url: String,
    code: &'a str,
    replace_tokens: bool,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: TokenUser,
    #[serde(default)]
    real_user: Option<TokenUser>,
}

#[derive(Deserialize)]
struct TokenUser {
    id: UserId,
}

/// LMS user ids are numeric but some deployments send them as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum UserId {
    Number(i64),
    Text(String),
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        match value {
            UserId::Number(id) => id.to_string(),
            UserId::Text(id) => id,
        }
    }
}

impl From<TokenResponse> for IdentityClaims {
    fn from(value: TokenResponse) -> Self {
        Self::new(
            value.access_token,
            value.user.id.into(),
            value.real_user.map(|user| user.id.into()),
        )
    }
}

/// OAuth client for the LMS.
#[derive(Debug, Clone)]
pub struct LmsOAuthClient {
    http: HttpClient,
    config: LmsConfig,
    proxy: ProxyConfig,
}

impl LmsOAuthClient {
    /// # Errors
    /// Returns `GradeBridgeError::Config` if the HTTP client cannot be built.
    pub fn new(config: LmsConfig, proxy: ProxyConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("gradebridge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config, proxy })
    }

    /// Where the LMS should send the browser back to:
    /// `{proxy.base}{base_path}{redirect_path}?course_id=<id>`.
    ///
    /// # Errors
    /// `Config` when the proxy base is not an absolute URL.
    pub fn callback_url(&self, base_path: &str, redirect_path: &str, course_id: &str) -> Result<Url> {
        let base = Url::parse(&self.proxy.base)
            .map_err(|err| GradeBridgeError::Config(format!("invalid proxy base URL: {err}")))?;
        let mut url = base.join(&format!("{base_path}{redirect_path}")).map_err(|err| {
            GradeBridgeError::Config(format!("invalid callback path {base_path}{redirect_path}: {err}"))
        })?;
        url.query_pairs_mut().clear().append_pair("course_id", course_id);
        Ok(url)
    }

    /// The LMS authorize page the browser is redirected to.
    ///
    /// # Errors
    /// `Config` when the LMS host is not an absolute URL.
    pub fn authorization_url(&self, callback: &Url) -> Result<Url> {
        let mut url = Url::parse(&self.config.host)
            .and_then(|host| host.join(LMS_AUTHORIZE_PATH))
            .map_err(|err| GradeBridgeError::Config(format!("invalid LMS host: {err}")))?;
        url.query_pairs_mut()
            .clear()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", callback.as_str());
        Ok(url)
    }

    /// First hop of the login flow: validate the LTI launch and build the
    /// authorize redirect.
    ///
    /// `base_path` is the mount point of the routes and `redirect_path` the
    /// callback route below it.
    ///
    /// # Errors
    /// `missing_body` or `missing_attribute` for a bad launch, `Config` for
    /// unusable URLs.
    pub fn start_login(
        &self,
        launch: Option<&LtiLaunch>,
        base_path: &str,
        redirect_path: &str,
    ) -> Result<Url> {
        let course_id = validate_launch(launch)?;

        let callback = self.callback_url(base_path, redirect_path, &course_id)?;
        info!(callback = %callback, "next URL prepared");

        let url = self.authorization_url(&callback)?;
        info!(course_id = %course_id, "redirecting to LMS authorization");
        Ok(url)
    }

    fn token_url(&self) -> String {
        format!("{}{LMS_TOKEN_PATH}", self.config.host.trim_end_matches('/'))
    }
}

#[async_trait]
impl CredentialExchanger for LmsOAuthClient {
    async fn exchange_code(
        &self,
        code: &str,
        redirect: &RedirectContext,
    ) -> Result<IdentityClaims> {
        let payload = TokenRequest {
            grant_type: "authorization_code",
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            redirect_url: redirect.redirect_url(),
            code,
            replace_tokens: true,
        };

        let builder = self.http.request(Method::POST, self.token_url()).json(&payload);

        let response = self.http.send(builder).await.map_err(|err| {
            error!(error = %err, "token exchange request failed");
            GradeBridgeError::Auth(format!("token exchange failed: {err}"))
        })?;

        let body: TokenResponse = response.json().await.map_err(|err| {
            error!(error = %err.without_url(), "token exchange response could not be decoded");
            GradeBridgeError::Auth("token exchange returned an unexpected body".into())
        })?;

        Ok(body.into())
    }
}
