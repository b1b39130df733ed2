//! Observability: tracing subscriber setup.

pub mod logging;

pub use logging::{init_tracing, LogFormat};
