//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::RuntimeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `control.endpoint`.
pub const ENV_ADMIN_SOCKET: &str = "ADMIN_SOCKET";
/// Environment variable overriding `reload.flag_path`.
pub const ENV_RELOAD_FLAG: &str = "RELOAD_FLAG";
/// Environment variable overriding `auth.token`.
pub const ENV_API_TOKEN: &str = "API_TOKEN";
/// Environment variable overriding `listener.bind_address`.
pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
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

/// Load configuration from an optional TOML file plus the process environment.
pub fn load_config(path: Option<&Path>) -> Result<RuntimeConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Load configuration using `lookup` in place of the process environment.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<RuntimeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => RuntimeConfig::default(),
    };

    apply_env_overrides(&mut config, lookup);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_env_overrides<F>(config: &mut RuntimeConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(endpoint) = lookup(ENV_ADMIN_SOCKET) {
        config.control.endpoint = endpoint;
    }
    if let Some(flag) = lookup(ENV_RELOAD_FLAG) {
        config.reload.flag_path = PathBuf::from(flag);
    }
    if let Some(token) = lookup(ENV_API_TOKEN) {
        config.auth.token = Some(token);
    }
    if let Some(bind) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = bind;
    }
}
