//! `AccessContext` codec for the signed session cookie.
//!
//! Format: `base64url(json) "." hex(mac)` where `mac` is a keyed BLAKE3 hash
//! of the encoded payload. The key is derived from the configured secret, so
//! rotating the secret invalidates every outstanding cookie.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use gradebridge_domain::{AccessContext, GradeBridgeError, Result, SessionConfig};
use tracing::debug;

/// Name of the cookie holding the encoded access context.
pub const SESSION_COOKIE_NAME: &str = "access_data";

const KEY_CONTEXT: &str = "gradebridge 2024-01 session cookie signing key";

/// Encoder/verifier for session cookie values.
#[derive(Clone)]
pub struct SessionCookie {
    key: [u8; blake3::KEY_LEN],
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookie").field("key", &"<redacted>").finish()
    }
}

impl SessionCookie {
    /// # Errors
    /// `Config` when the secret is empty.
    pub fn new(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(GradeBridgeError::Config("cookie signature secret is empty".into()));
        }
        Ok(Self { key: blake3::derive_key(KEY_CONTEXT, secret.as_bytes()) })
    }

    /// # Errors
    /// See [`SessionCookie::new`].
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        Self::new(&config.cookie_secret)
    }

    /// Serialize and sign `context`.
    ///
    /// # Errors
    /// `Internal` if the context cannot be serialized.
    pub fn encode(&self, context: &AccessContext) -> Result<String> {
        let json = serde_json::to_vec(context)
            .map_err(|err| GradeBridgeError::Internal(format!("access context: {err}")))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let mac = blake3::keyed_hash(&self.key, payload.as_bytes());
        Ok(format!("{payload}.{}", mac.to_hex()))
    }

    /// Verify and parse a cookie value.
    ///
    /// Anything that is malformed, tampered with, or signed with another key
    /// yields `None`.
    #[must_use]
    pub fn decode(&self, value: &str) -> Option<AccessContext> {
        let (payload, mac_hex) = value.trim().split_once('.')?;

        let Ok(mac) = blake3::Hash::from_hex(mac_hex) else {
            debug!("session cookie has a malformed signature");
            return None;
        };
        // `Hash` equality is constant time.
        if blake3::keyed_hash(&self.key, payload.as_bytes()) != mac {
            debug!("session cookie signature mismatch");
            return None;
        }

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(real: Option<&str>) -> AccessContext {
        AccessContext {
            token: "tok-123".into(),
            user_id: "10".into(),
            real_user_id: real.map(str::to_string),
        }
    }

    #[test]
    fn decodes_what_it_encodes() {
        let codec = SessionCookie::new("s3cret").unwrap();
        let value = codec.encode(&context(Some("11"))).unwrap();
        assert_eq!(codec.decode(&value), Some(context(Some("11"))));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let codec = SessionCookie::new("s3cret").unwrap();
        let value = codec.encode(&context(None)).unwrap();
        let (_, mac) = value.split_once('.').unwrap();

        let forged = URL_SAFE_NO_PAD.encode(br#"{"token":"t","userId":"1"}"#);
        assert_eq!(codec.decode(&format!("{forged}.{mac}")), None);
    }

    #[test]
    fn other_secret_is_rejected() {
        let value = SessionCookie::new("one").unwrap().encode(&context(None)).unwrap();
        assert_eq!(SessionCookie::new("two").unwrap().decode(&value), None);
    }

    #[test]
    fn garbage_is_rejected() {
        let codec = SessionCookie::new("s3cret").unwrap();
        assert_eq!(codec.decode(""), None);
        assert_eq!(codec.decode("no-dot"), None);
        assert_eq!(codec.decode("abc.zz"), None);
    }

    #[test]
    fn empty_secret_is_a_config_error() {
        let err = SessionCookie::from_config(&SessionConfig { cookie_secret: String::new() })
            .unwrap_err();
        assert_eq!(err.kind(), "config");
    }
}
