//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides the listener bind address.
pub const ENV_BIND: &str = "CALL_SERVER_BIND";
/// Overrides the upstream base address.
pub const ENV_UPSTREAM: &str = "CALL_SERVER_UPSTREAM";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ProxyConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply explicit overrides on top of a loaded config and re-validate.
///
/// `None` leaves the existing value untouched.
pub fn apply_overrides(
    mut config: ProxyConfig,
    bind_address: Option<String>,
    upstream_base_url: Option<String>,
) -> Result<ProxyConfig, ConfigError> {
    if let Some(bind) = bind_address {
        config.listener.bind_address = bind;
    }
    if let Some(base_url) = upstream_base_url {
        config.upstream.base_url = base_url;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
