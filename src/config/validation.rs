//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the control endpoint is usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RuntimeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::RuntimeConfig;
use crate::relay::endpoint::ControlEndpoint;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("control.endpoint is invalid: {0}")]
    Endpoint(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("reload.flag_path must not be empty")]
    EmptyFlagPath,

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &RuntimeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Err(e) = config.control.endpoint.parse::<ControlEndpoint>() {
        errors.push(ValidationError::Endpoint(e.to_string()));
    }

    let timeouts = [
        ("control.connect_timeout_ms", config.control.connect_timeout_ms),
        ("control.read_timeout_ms", config.control.read_timeout_ms),
        ("control.write_timeout_ms", config.control.write_timeout_ms),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ];
    for (name, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if config.reload.flag_path.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyFlagPath);
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
