//! Error types used throughout the application
//!
//! Every failure that leaves the access layer is one of these variants. None
//! of them hold a live transport handle: the transport variant is built from
//! plain strings so client certificate material can never ride along into
//! logs or downstream handlers.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Codes for failures that are caused by the caller and shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientErrorCode {
    /// No access context in the request or in the session cookie.
    NoCookie,
    /// Impersonation detected or an authorization check denied access.
    NotAllowed,
    /// The LTI launch request had no body.
    MissingBody,
    /// The LTI launch body lacks `custom_canvas_course_id`.
    MissingAttribute,
    /// The OAuth callback lacks `course_id`.
    MissingQueryParameters,
    /// The user declined the authorization or no code was returned.
    AccessDenied,
    /// The LMS reported an OAuth error other than `access_denied`.
    UnknownOauthError,
}

impl ClientErrorCode {
    /// Stable label for logs and error pages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoCookie => "no_cookie",
            Self::NotAllowed => "not_allowed",
            Self::MissingBody => "missing_body",
            Self::MissingAttribute => "missing_attribute",
            Self::MissingQueryParameters => "missing_query_parameters",
            Self::AccessDenied => "access_denied",
            Self::UnknownOauthError => "unknown_oauth_error",
        }
    }
}

impl fmt::Display for ClientErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-facing failure with an informative message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientError {
    code: ClientErrorCode,
    message: String,
}

impl ClientError {
    /// Create a client error with the given code and message.
    pub fn new(code: ClientErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Shorthand for [`ClientErrorCode::NotAllowed`].
    pub fn not_allowed(message: impl Into<String>) -> Self {
        Self::new(ClientErrorCode::NotAllowed, message)
    }

    /// Shorthand for [`ClientErrorCode::NoCookie`].
    pub fn no_cookie(message: impl Into<String>) -> Self {
        Self::new(ClientErrorCode::NoCookie, message)
    }

    /// The error code.
    #[must_use]
    pub const fn code(&self) -> ClientErrorCode {
        self.code
    }

    /// The user-facing message. May be empty.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ClientError {}

/// A sanitized network or HTTP failure.
///
/// Holds only a description and, when the server answered, its status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportError {
    message: String,
    status: Option<u16>,
}

impl TransportError {
    /// Failure without an HTTP status (connect, timeout, body read...).
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), status: None }
    }

    /// Failure carrying the HTTP status the server answered with.
    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self { message: message.into(), status: Some(status) }
    }

    /// Description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status code, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for TransportError {}

/// Main error type for GradeBridge
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum GradeBridgeError {
    /// The identity provider token exchange failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("{0}")]
    Client(ClientError),

    #[error("Transport error: {0}")]
    Transport(TransportError),

    /// An upstream answered with a body we could not interpret.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GradeBridgeError {
    /// Stable label classifying the failure, suitable for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Auth(_) => "upstream_failure",
            Self::Client(err) => err.code().as_str(),
            Self::Transport(_) => "transport",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }

    /// The client error code, if this is a user-facing failure.
    #[must_use]
    pub const fn client_code(&self) -> Option<ClientErrorCode> {
        match self {
            Self::Client(err) => Some(err.code()),
            _ => None,
        }
    }

    /// Whether the failure is caused by the caller and meant to be shown to
    /// them, as opposed to a system failure.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::Client(_))
    }
}

impl From<ClientError> for GradeBridgeError {
    fn from(value: ClientError) -> Self {
        Self::Client(value)
    }
}

impl From<TransportError> for GradeBridgeError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

/// Result type alias for GradeBridge operations
pub type Result<T> = std::result::Result<T, GradeBridgeError>;
