// src/config.rs

//! Configuration loading utilities.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables. The result is validated once and never
//! re-read.

use std::path::Path;

use crate::error::Result;
use crate::models::{ApiConfig, Config};

/// Broker host as seen from inside the Lambda container.
pub const LAMBDA_BROKER_HOST: &str = "host.docker.internal";

/// Read a variable from the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Load configuration for the local tools.
///
/// A missing file falls back to defaults with a warning. An unreadable or
/// malformed file, invalid environment values and failed validation are
/// errors.
pub fn load(path: Option<&Path>) -> Result<Config> {
    load_with(path, process_env)
}

/// [`load`] with an explicit environment lookup.
pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => Config::load_or_default(path)?,
        None => Config::default(),
    };
    config.apply_env(lookup)?;
    config.validate()?;
    Ok(config)
}

/// Load the web API settings.
///
/// Only the `api` section is validated; the provisioning sections are
/// not used by the server.
pub fn load_api() -> Result<ApiConfig> {
    load_api_with(process_env)
}

/// [`load_api`] with an explicit environment lookup.
pub fn load_api_with<F>(lookup: F) -> Result<ApiConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();
    config.apply_env(lookup)?;
    config.api.validate()?;
    Ok(config.api)
}

/// Load configuration inside the Lambda runtime.
///
/// Identical to [`load`] except that the broker host defaults to the
/// Docker host gateway.
pub fn load_for_lambda() -> Result<Config> {
    load_for_lambda_with(process_env)
}

/// [`load_for_lambda`] with an explicit environment lookup.
pub fn load_for_lambda_with<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();
    config.broker.host = LAMBDA_BROKER_HOST.to_string();
    config.apply_env(lookup)?;
    config.validate()?;
    Ok(config)
}
