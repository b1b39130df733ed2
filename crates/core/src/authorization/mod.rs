//! Request authorization: ordered capability checks with deny-by-default
//! semantics.

pub mod gate;
pub mod ports;

pub use gate::{
    is_denial, resolve_access_context, LmsStaffCheck, PermissionGate, RegistryWriteCheck,
};
pub use ports::{CapabilityCheck, LmsPermissions, RegistryPermissions};
