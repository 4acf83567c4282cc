//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from environment or config
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level
//! - The shared token is never logged; commands only at debug

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter used when `RUST_LOG` is not set.
pub fn default_filter(log_level: &str) -> String {
    format!("runtime_api={log_level},tower_http={log_level}")
}

/// Install the global subscriber.
pub fn init(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
