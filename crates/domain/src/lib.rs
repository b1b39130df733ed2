//! # GradeBridge Domain
//!
//! Domain types shared by the access layer.
//!
//! This crate contains:
//! - Identity and access context types
//! - Registry search criteria and pages
//! - Configuration structures
//! - The error taxonomy and `Result` alias
//!
//! ## Architecture
//! - No dependencies on other GradeBridge crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
