//! Login flow orchestration - core business logic

use std::sync::Arc;

use gradebridge_domain::{AccessContext, CallbackQuery, RedirectContext, Result};
use tracing::{error, info};

use super::callback::validate_callback;
use super::identity_guard::check_impersonation;
use super::ports::CredentialExchanger;

/// Completes the OAuth callback hop of the login flow.
pub struct LoginService {
    exchanger: Arc<dyn CredentialExchanger>,
}

impl LoginService {
    /// Create a new login service
    pub fn new(exchanger: Arc<dyn CredentialExchanger>) -> Self {
        Self { exchanger }
    }

    /// Validate the callback, redeem the code and vet the resulting identity.
    ///
    /// The code is redeemed at most once; failures are never retried.
    ///
    /// # Errors
    /// Callback validation errors, `GradeBridgeError::Auth` if the exchange
    /// fails, or `not_allowed` for a masquerade session.
    pub async fn complete_login(
        &self,
        query: Option<&CallbackQuery>,
        redirect: &RedirectContext,
    ) -> Result<AccessContext> {
        let authorization = validate_callback(query)?;

        let claims = self
            .exchanger
            .exchange_code(&authorization.code, redirect)
            .await
            .inspect_err(|err| {
                error!(error = %err, "Could not get access data from the LMS");
            })?;

        check_impersonation(&claims)?;

        info!(
            user_id = %claims.user_id,
            course_id = %authorization.course_id,
            "LMS login completed"
        );
        Ok(claims.into())
    }
}
