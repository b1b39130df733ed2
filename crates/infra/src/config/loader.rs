//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Read a `.env` file from the working directory, if any
//! 2. Attempt to load from environment variables
//! 3. If incomplete, fall back to loading from file
//! 4. Probe multiple paths for config files (JSON or TOML)
//!
//! ## Environment Variables
//! - `LADOK_API_BASEURL`: Registry base URL (required)
//! - `LADOK_API_PFX_BASE64`: Base64 PKCS#12 client certificate
//! - `LADOK_API_PFX_PASSPHRASE`: Passphrase of the certificate
//! - `CANVAS_HOST`: LMS origin (required)
//! - `CANVAS_CLIENT_ID`: OAuth client id (required)
//! - `CANVAS_CLIENT_SECRET`: OAuth client secret (required)
//! - `COOKIE_SIGNATURE_SECRET`: Session cookie signing secret (required)
//! - `PROXY_BASE`: Public origin of the application
//! - `PROXY_PATH`: Mount path of the application
//! - `GRADEBRIDGE_HTTP_TIMEOUT_SECS`: Timeout for both upstreams, in seconds
//!
//! ## File Locations
//! `config.{json,toml}` and `gradebridge.{json,toml}` in the working
//! directory and up to two parents, then next to the executable.

use std::path::{Path, PathBuf};

use gradebridge_domain::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use gradebridge_domain::{
    Config, GradeBridgeError, LmsConfig, ProxyConfig, RegistryConfig, Result, SessionConfig,
};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["config.json", "config.toml", "gradebridge.json", "gradebridge.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `GradeBridgeError::Config` if neither the environment nor any
/// config file yields a complete, valid configuration.
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "Ignoring unreadable .env file"),
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `GradeBridgeError::Config` if a required variable is missing or
/// the timeout is not a number.
pub fn load_from_env() -> Result<Config> {
    let timeout_secs = match env_opt("GRADEBRIDGE_HTTP_TIMEOUT_SECS") {
        Some(raw) => raw.parse::<u64>().map_err(|e| {
            GradeBridgeError::Config(format!("Invalid GRADEBRIDGE_HTTP_TIMEOUT_SECS: {e}"))
        })?,
        None => DEFAULT_HTTP_TIMEOUT_SECS,
    };

    Ok(Config {
        registry: RegistryConfig {
            base_url: env_var("LADOK_API_BASEURL")?,
            pfx_base64: env_opt("LADOK_API_PFX_BASE64"),
            pfx_passphrase: env_opt("LADOK_API_PFX_PASSPHRASE").unwrap_or_default(),
            timeout_secs,
        },
        lms: LmsConfig {
            host: env_var("CANVAS_HOST")?,
            client_id: env_var("CANVAS_CLIENT_ID")?,
            client_secret: env_var("CANVAS_CLIENT_SECRET")?,
            timeout_secs,
        },
        session: SessionConfig { cookie_secret: env_var("COOKIE_SIGNATURE_SECRET")? },
        proxy: ProxyConfig {
            base: env_opt("PROXY_BASE").unwrap_or_default(),
            path: env_opt("PROXY_PATH").unwrap_or_default(),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations via
/// [`probe_config_paths`]. Format is chosen by file extension.
///
/// # Errors
/// Returns `GradeBridgeError::Config` if the file is missing, unreadable, or
/// invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(GradeBridgeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            GradeBridgeError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| GradeBridgeError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| GradeBridgeError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| GradeBridgeError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(GradeBridgeError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.extend([exe_dir.clone(), exe_dir.join("..")]);
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        GradeBridgeError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Optional environment variable; empty counts as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
