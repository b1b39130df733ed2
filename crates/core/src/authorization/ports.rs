//! Port interfaces for authorization decisions
//!
//! Both predicates live outside this workspace's core: they call the
//! registry and the LMS with the user's bearer token.

use async_trait::async_trait;
use gradebridge_domain::Result;

/// "May this user write results in the registry for this course?"
#[async_trait]
pub trait RegistryPermissions: Send + Sync {
    async fn is_allowed_in_registry(&self, token: &str, course_id: &str) -> Result<bool>;
}

/// "May this user act as teacher or examiner for this course in the LMS?"
#[async_trait]
pub trait LmsPermissions: Send + Sync {
    async fn is_allowed_in_lms(&self, token: &str, course_id: &str) -> Result<bool>;
}

/// One capability check in the permission gate's ordered list.
#[async_trait]
pub trait CapabilityCheck: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Message shown to the user when this check denies access.
    fn denial_message(&self) -> &str;

    /// Evaluate the check.
    ///
    /// `Ok(false)` is a denial; `Err` is an unexpected failure.
    async fn is_allowed(&self, token: &str, resource_id: &str) -> Result<bool>;
}
