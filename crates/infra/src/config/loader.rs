//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `ALACRITY_BASE_DOMAIN` is unset or a value is invalid, falls back
//!    to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `ALACRITY_BASE_DOMAIN`: Server origin (required)
//! - `ALACRITY_API_PATH`: API prefix, default `/api/v1`
//! - `ALACRITY_LOGIN_ENDPOINT`: Login path, default `/login`
//! - `ALACRITY_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `ALACRITY_USER_AGENT`: User agent header
//! - `ALACRITY_DESTROY_BEHAVIOR`: `suppress` or `cancel`
//! - `ALACRITY_REAUTH_MODE`: `per_request` or `shared`
//!
//! ## File Locations
//! The loader probes `alacrity.{json,toml}` then `config.{json,toml}` in the
//! current directory, its parent, and next to the executable.

use std::path::{Path, PathBuf};

use alacrity_domain::{AlacrityError, ClientConfig, DestroyBehavior, ReauthMode, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["alacrity.json", "alacrity.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `AlacrityError::Config` if configuration cannot be loaded from
/// either source, or the loaded configuration is invalid.
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `AlacrityError::Config` if `ALACRITY_BASE_DOMAIN` is missing or
/// a variable has an invalid value.
pub fn load_from_env() -> Result<ClientConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Build configuration from an arbitrary variable source
///
/// `lookup` is consulted with the same keys as [`load_from_env`].
///
/// # Errors
/// Same as [`load_from_env`].
pub fn load_from_lookup<F>(lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|value| value.trim().to_string()).filter(|v| !v.is_empty());

    let base_domain = var("ALACRITY_BASE_DOMAIN").ok_or_else(|| {
        AlacrityError::Config("Missing required environment variable: ALACRITY_BASE_DOMAIN".into())
    })?;

    let mut config = ClientConfig::new(base_domain);

    if let Some(api_path) = var("ALACRITY_API_PATH") {
        config.api_path = api_path;
    }
    if let Some(login_endpoint) = var("ALACRITY_LOGIN_ENDPOINT") {
        config.login_endpoint = login_endpoint;
    }
    if let Some(timeout) = var("ALACRITY_TIMEOUT_SECS") {
        config.timeout_secs = timeout
            .parse::<u64>()
            .map_err(|e| AlacrityError::Config(format!("Invalid timeout: {}", e)))?;
    }
    if let Some(user_agent) = var("ALACRITY_USER_AGENT") {
        config.user_agent = user_agent;
    }
    if let Some(behavior) = var("ALACRITY_DESTROY_BEHAVIOR") {
        config.destroy_behavior = behavior.parse::<DestroyBehavior>().map_err(AlacrityError::Config)?;
    }
    if let Some(mode) = var("ALACRITY_REAUTH_MODE") {
        config.reauth_mode = mode.parse::<ReauthMode>().map_err(AlacrityError::Config)?;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations via
/// [`probe_config_paths`]. Format is detected by file extension.
///
/// # Errors
/// Returns `AlacrityError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AlacrityError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AlacrityError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AlacrityError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AlacrityError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AlacrityError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(AlacrityError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// Returns the first existing file, or `None`.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}
