//! Login flow: callback validation, code exchange port, impersonation checks.

pub mod callback;
pub mod identity_guard;
pub mod ports;
pub mod service;

pub use callback::{validate_callback, validate_launch};
pub use identity_guard::{check_impersonation, deny_act_as};
pub use ports::CredentialExchanger;
pub use service::LoginService;
