//! Configuration structures
//!
//! Loaded once at startup (see `gradebridge_infra::config`) and treated as
//! immutable afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_HTTP_TIMEOUT_SECS;

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub registry: RegistryConfig,
    pub lms: LmsConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
}

/// Connection settings for the student-records registry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base URL every endpoint is appended to.
    pub base_url: String,
    /// Base64-encoded PKCS#12 bundle holding the client certificate and key.
    /// Absent only for plain-HTTP test servers.
    #[serde(default)]
    pub pfx_base64: Option<String>,
    /// Passphrase protecting the PKCS#12 bundle.
    #[serde(default)]
    pub pfx_passphrase: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("base_url", &self.base_url)
            .field("pfx_base64", &self.pfx_base64.as_ref().map(|_| "<redacted>"))
            .field("pfx_passphrase", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// OAuth client settings for the LMS.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LmsConfig {
    /// LMS origin, e.g. `https://canvas.example.edu`.
    pub host: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for LmsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LmsConfig")
            .field("host", &self.host)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Session cookie signing settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_secret: String,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig").field("cookie_secret", &"<redacted>").finish()
    }
}

/// Where the application is mounted behind the reverse proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Public origin, e.g. `https://app.example.edu`.
    #[serde(default)]
    pub base: String,
    /// Path prefix the routes are mounted under, e.g. `/api/lti-export`.
    #[serde(default)]
    pub path: String,
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}
