//! Reload signalling through a flag file.
//!
//! An external watcher polls the flag path and reloads the proxy when it
//! changes. This side only writes the sentinel; it never waits for or
//! observes the reload itself.

use std::path::PathBuf;

use crate::config::ReloadConfig;
use crate::error::{Result, RuntimeError};
use crate::observability::metrics;

/// Content written to the flag file.
pub const RELOAD_SENTINEL: &str = "reload\n";

#[derive(Debug, Clone)]
pub struct ReloadSignal {
    flag_path: PathBuf,
}

impl ReloadSignal {
    pub fn new(flag_path: impl Into<PathBuf>) -> Self {
        Self {
            flag_path: flag_path.into(),
        }
    }

    pub fn from_config(config: &ReloadConfig) -> Self {
        Self::new(config.flag_path.clone())
    }

    /// Write the sentinel, creating missing parent directories.
    ///
    /// Repeated calls leave the same content on disk.
    pub async fn trigger(&self) -> Result<()> {
        let result = self.write_flag().await;
        metrics::record_reload(result.is_ok());

        match &result {
            Ok(()) => tracing::info!(path = %self.flag_path.display(), "Reload flag written"),
            Err(e) => tracing::error!(path = %self.flag_path.display(), error = %e, "Reload flag write failed"),
        }
        result
    }

    async fn write_flag(&self) -> Result<()> {
        if let Some(parent) = self.flag_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RuntimeError::internal("Unable to write reload flag", e))?;
        }

        tokio::fs::write(&self.flag_path, RELOAD_SENTINEL)
            .await
            .map_err(|e| RuntimeError::internal("Unable to write reload flag", e))
    }
}
