//! Deny-by-default permission gate

use std::sync::Arc;

use async_trait::async_trait;
use gradebridge_domain::constants::{
    LMS_DENIED_MESSAGE, NO_ACCESS_DATA_MESSAGE, REGISTRY_DENIED_MESSAGE,
};
use gradebridge_domain::{AccessContext, ClientError, ClientErrorCode, GradeBridgeError, Result};
use tracing::{debug, error, info};

use super::ports::{CapabilityCheck, LmsPermissions, RegistryPermissions};

/// Pick the access context for a request: request-local state wins over the
/// session cookie.
pub fn resolve_access_context(
    request_local: Option<AccessContext>,
    cookie: Option<AccessContext>,
) -> Option<AccessContext> {
    request_local.or(cookie)
}

/// Evaluates an ordered list of capability checks, stopping at the first one
/// that does not grant access.
pub struct PermissionGate {
    checks: Vec<Arc<dyn CapabilityCheck>>,
}

impl PermissionGate {
    /// Gate with no checks. Add them in evaluation order with
    /// [`PermissionGate::with_check`].
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// The standard gate: registry write permission first, then LMS staff
    /// permission.
    pub fn standard(
        registry: Arc<dyn RegistryPermissions>,
        lms: Arc<dyn LmsPermissions>,
    ) -> Self {
        Self::new()
            .with_check(Arc::new(RegistryWriteCheck::new(registry)))
            .with_check(Arc::new(LmsStaffCheck::new(lms)))
    }

    /// Append a check. Checks run in the order they were added.
    #[must_use]
    pub fn with_check(mut self, check: Arc<dyn CapabilityCheck>) -> Self {
        self.checks.push(check);
        self
    }

    /// Authorize `context` for `resource_id`.
    ///
    /// # Errors
    /// - `no_cookie` when there is no context; no check is evaluated
    /// - `not_allowed` from the first check that denies access
    /// - the unchanged error of a check that fails unexpectedly
    pub async fn authorize(&self, context: Option<&AccessContext>, resource_id: &str) -> Result<()> {
        let Some(context) = context else {
            return Err(ClientError::no_cookie(NO_ACCESS_DATA_MESSAGE).into());
        };

        match self.evaluate(context.token(), resource_id).await {
            Ok(()) => {
                debug!(user_id = %context.user_id, resource_id, "User authorized");
                Ok(())
            }
            Err(err) if err.client_code() == Some(ClientErrorCode::NotAllowed) => {
                info!(user_id = %context.user_id, resource_id, error = %err, "User is not authorized");
                Err(err)
            }
            Err(err) => {
                error!(
                    user_id = %context.user_id,
                    resource_id,
                    error = %err,
                    "Could not authorize user properly"
                );
                Err(err)
            }
        }
    }

    async fn evaluate(&self, token: &str, resource_id: &str) -> Result<()> {
        if self.checks.is_empty() {
            return Err(ClientError::not_allowed("No authorization checks are configured").into());
        }

        for check in &self.checks {
            if !check.is_allowed(token, resource_id).await? {
                debug!(check = check.name(), resource_id, "Capability check denied access");
                return Err(ClientError::not_allowed(check.denial_message()).into());
            }
        }
        Ok(())
    }
}

impl Default for PermissionGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry write permission as a capability check.
pub struct RegistryWriteCheck {
    permissions: Arc<dyn RegistryPermissions>,
}

impl RegistryWriteCheck {
    pub fn new(permissions: Arc<dyn RegistryPermissions>) -> Self {
        Self { permissions }
    }
}

#[async_trait]
impl CapabilityCheck for RegistryWriteCheck {
    fn name(&self) -> &'static str {
        "registry_write"
    }

    fn denial_message(&self) -> &str {
        REGISTRY_DENIED_MESSAGE
    }

    async fn is_allowed(&self, token: &str, resource_id: &str) -> Result<bool> {
        self.permissions.is_allowed_in_registry(token, resource_id).await
    }
}

/// LMS teacher/examiner permission as a capability check.
pub struct LmsStaffCheck {
    permissions: Arc<dyn LmsPermissions>,
}

impl LmsStaffCheck {
    pub fn new(permissions: Arc<dyn LmsPermissions>) -> Self {
        Self { permissions }
    }
}

#[async_trait]
impl CapabilityCheck for LmsStaffCheck {
    fn name(&self) -> &'static str {
        "lms_staff"
    }

    fn denial_message(&self) -> &str {
        LMS_DENIED_MESSAGE
    }

    async fn is_allowed(&self, token: &str, resource_id: &str) -> Result<bool> {
        self.permissions.is_allowed_in_lms(token, resource_id).await
    }
}

/// Keeps unexpected failures distinguishable from denials in callers that
/// only hold a `GradeBridgeError`.
#[must_use]
pub fn is_denial(err: &GradeBridgeError) -> bool {
    err.client_code() == Some(ClientErrorCode::NotAllowed)
}
