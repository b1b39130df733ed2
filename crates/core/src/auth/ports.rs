//! Port interfaces for the login flow
//!
//! Implemented by the LMS OAuth adapter in `gradebridge-infra`.

use async_trait::async_trait;
use gradebridge_domain::{IdentityClaims, RedirectContext, Result};

/// Exchanges a single-use authorization code for identity claims.
#[async_trait]
pub trait CredentialExchanger: Send + Sync {
    /// Exchange `code` at the identity provider's token endpoint.
    ///
    /// Implementations must issue exactly one request and must not retry:
    /// authorization codes can only be redeemed once.
    ///
    /// # Errors
    /// Any transport or provider failure is reported as
    /// `GradeBridgeError::Auth`.
    async fn exchange_code(
        &self,
        code: &str,
        redirect: &RedirectContext,
    ) -> Result<IdentityClaims>;
}
