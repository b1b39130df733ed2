//! Plain data handed over by the web layer during the OAuth login flow.

use serde::{Deserialize, Serialize};

/// Body of the LTI launch request that starts the login flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LtiLaunch {
    #[serde(default)]
    pub custom_canvas_course_id: Option<String>,
}

/// Query parameters the LMS sends to the OAuth callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A validated callback: the single-use code and the course it was issued for.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationCode {
    pub code: String,
    pub course_id: String,
}

impl std::fmt::Debug for AuthorizationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationCode")
            .field("code", &"<redacted>")
            .field("course_id", &self.course_id)
            .finish()
    }
}

/// How the callback request reached us; used to rebuild the redirect URL
/// the identity provider expects to see again during the token exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectContext {
    /// `http` or `https`.
    pub protocol: String,
    /// Host header, including the port when non-default.
    pub host: String,
    /// Original path and query of the callback request.
    pub original_url: String,
}

impl RedirectContext {
    pub fn new(
        protocol: impl Into<String>,
        host: impl Into<String>,
        original_url: impl Into<String>,
    ) -> Self {
        Self { protocol: protocol.into(), host: host.into(), original_url: original_url.into() }
    }

    /// `{protocol}://{host}{original_url}`
    #[must_use]
    pub fn redirect_url(&self) -> String {
        format!("{}://{}{}", self.protocol, self.host, self.original_url)
    }
}
