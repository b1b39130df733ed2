//! Configuration loading
//!
//! Builds the immutable [`gradebridge_domain::Config`] from the environment
//! or from a config file.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
