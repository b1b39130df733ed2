//! Integration tests for configuration loader
//!
//! Loads configuration files end to end and builds the adapters from them.

use std::io::Write;
use std::path::PathBuf;

use gradebridge_domain::GradeBridgeError;
use gradebridge_infra::{config, LmsOAuthClient, RegistryClient, SessionCookie};
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_toml_file_builds_adapters() {
    let path = write_config(
        r#"
[registry]
base_url = "https://api.registry.test/"
timeout_secs = 10

[lms]
host = "https://canvas.test"
client_id = "10000000000001"
client_secret = "lms-secret"

[session]
cookie_secret = "cookie-secret"

[proxy]
base = "https://app.test"
path = "/api/lti-export"
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config from TOML");
    assert_eq!(config.registry.timeout_secs, 10);
    assert_eq!(config.lms.client_id, "10000000000001");
    assert_eq!(config.proxy.path, "/api/lti-export");

    RegistryClient::new(&config.registry).expect("registry client");
    SessionCookie::from_config(&config.session).expect("session cookie codec");
    let lms = LmsOAuthClient::new(config.lms.clone(), config.proxy.clone()).expect("lms client");
    let callback = lms.callback_url(&config.proxy.path, "/auth/callback", "42").unwrap();
    assert_eq!(callback.as_str(), "https://app.test/api/lti-export/auth/callback?course_id=42");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_missing_section() {
    let path = write_config(
        r#"{ "registry": { "base_url": "https://api.registry.test" } }"#,
        "json",
    );

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(GradeBridgeError::Config(ref msg)) if msg.contains("JSON")));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_invalid_toml() {
    let path = write_config("[registry\nbase_url = ", "toml");

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(GradeBridgeError::Config(ref msg)) if msg.contains("TOML")));

    std::fs::remove_file(path).ok();
}
