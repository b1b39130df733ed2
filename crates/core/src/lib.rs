//! # GradeBridge Core
//!
//! Pure access-layer policy - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the identity provider and the two
//!   authorization predicates
//! - OAuth callback validation and login orchestration
//! - Impersonation checks
//! - The deny-by-default permission gate
//!
//! ## Architecture Principles
//! - Only depends on `gradebridge-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits

pub mod auth;
pub mod authorization;

pub use auth::{
    check_impersonation, deny_act_as, validate_callback, validate_launch, CredentialExchanger,
    LoginService,
};
pub use authorization::{
    is_denial, resolve_access_context, CapabilityCheck, LmsPermissions, LmsStaffCheck,
    PermissionGate, RegistryPermissions, RegistryWriteCheck,
};
