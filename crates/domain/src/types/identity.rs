//! Identity types produced by the login flow and carried per request.

use serde::{Deserialize, Serialize};

/// Normalised identity returned by the LMS token exchange.
///
/// `real_user_id` is only present when the LMS session is an impersonation
/// ("acting as") session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClaims {
    pub token: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_user_id: Option<String>,
}

impl IdentityClaims {
    #[must_use]
    pub fn new(token: String, user_id: String, real_user_id: Option<String>) -> Self {
        Self { token, user_id, real_user_id }
    }
}

/// Per-request authorization state.
///
/// Created at login, reused for the browser session and never mutated.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessContext {
    pub token: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_user_id: Option<String>,
}

impl AccessContext {
    /// Bearer token to use against the LMS and the registry.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl From<IdentityClaims> for AccessContext {
    fn from(claims: IdentityClaims) -> Self {
        Self { token: claims.token, user_id: claims.user_id, real_user_id: claims.real_user_id }
    }
}

// The token is a bearer credential; keep it out of debug output.
impl std::fmt::Debug for AccessContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessContext")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("real_user_id", &self.real_user_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_context_round_trips_camel_case() {
        let context = AccessContext {
            token: "t".into(),
            user_id: "1".into(),
            real_user_id: Some("2".into()),
        };
        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(json["userId"], "1");
        assert_eq!(json["realUserId"], "2");
    }

    #[test]
    fn missing_real_user_deserializes_as_none() {
        let context: AccessContext =
            serde_json::from_str(r#"{"token":"t","userId":"1"}"#).unwrap();
        assert!(context.real_user_id.is_none());
    }

    #[test]
    fn debug_output_hides_token() {
        let context = AccessContext::from(IdentityClaims::new("secret".into(), "1".into(), None));
        assert!(!format!("{context:?}").contains("secret"));
    }
}
