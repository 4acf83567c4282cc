//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (ADMIN_SOCKET, RELOAD_FLAG, API_TOKEN, BIND_ADDRESS)
//!     → validation.rs (semantic checks)
//!     → RuntimeConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is loaded exactly once at startup and never mutated afterwards
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::RuntimeConfig;
pub use schema::{AuthConfig, ControlConfig, ListenerConfig, ReloadConfig};
