//! # GradeBridge Infrastructure
//!
//! Adapters implementing the ports of `gradebridge-core` against the real
//! upstreams.
//!
//! This crate contains:
//! - The shared HTTP transport with sanitized errors
//! - The registry client and its paginated search
//! - The LMS OAuth client
//! - The signed session cookie codec
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `gradebridge-core`
//! - Contains all I/O

pub mod config;
pub mod errors;
pub mod http;
pub mod lms;
pub mod observability;
pub mod registry;
pub mod session;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use lms::LmsOAuthClient;
pub use observability::{init_tracing, LogFormat};
pub use registry::{page_count, ElementStream, RegistryClient, SearchStream};
pub use session::{SessionCookie, SESSION_COOKIE_NAME};
