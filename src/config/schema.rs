//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the runtime API.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for the runtime API.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Control socket the commands are relayed to.
    pub control: ControlConfig,

    /// Reload flag settings.
    pub reload: ReloadConfig,

    /// Shared-secret authentication.
    pub auth: AuthConfig,

    /// Timeout configuration for the HTTP side.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Control socket configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Endpoint of the administrative socket.
    ///
    /// Accepts a bare path, `unix:///path` or `tcp://host:port`.
    pub endpoint: String,

    /// Deadline for establishing the connection, in milliseconds.
    pub connect_timeout_ms: u64,

    /// Idle deadline applied to every read, in milliseconds.
    pub read_timeout_ms: u64,

    /// Deadline for writing the command, in milliseconds.
    pub write_timeout_ms: u64,
}

impl ControlConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            endpoint: "/var/run/haproxy/admin.sock".to_string(),
            connect_timeout_ms: 2000,
            read_timeout_ms: 2000,
            write_timeout_ms: 2000,
        }
    }
}

/// Reload flag configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// File written to ask the external watcher for a reload.
    pub flag_path: PathBuf,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            flag_path: PathBuf::from("/var/run/haproxy/reload.flag"),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret expected in request bodies.
    ///
    /// `None` (or an empty string) leaves the API open.
    pub token: Option<String>,
}

impl AuthConfig {
    /// The configured secret, if authentication is enabled.
    pub fn secret(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Timeout configuration for HTTP requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
