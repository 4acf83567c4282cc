//! Command relay to the proxy's runtime control socket.
//!
//! # Data Flow
//! ```text
//! command (opaque text)
//!     → endpoint.rs (socket present? otherwise 503, no connect)
//!     → connection.rs (fresh stream, connect deadline)
//!     → framing.rs (trim, append one '\n', write)
//!     → framing.rs (read until close or idle deadline)
//!     → connection dropped (closed on every path)
//!     → decoded, trimmed output
//! ```
//!
//! # Design Decisions
//! - One connection per command; nothing is pooled or shared between requests
//! - A read that goes idle ends the response, it is not a failure
//! - Command content is never inspected

pub mod connection;
pub mod endpoint;
pub mod framing;

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::ControlConfig;
use crate::error::{Result, RuntimeError};
use crate::observability::metrics;

pub use connection::ControlConnection;
pub use endpoint::{ControlEndpoint, EndpointError};
pub use framing::{IdleTimeoutFraming, ResponseFraming};

/// Output of a single relayed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayResult {
    pub output: String,
}

/// Relays one command per call to the control socket.
#[derive(Debug, Clone)]
pub struct SocketRelay<F = IdleTimeoutFraming> {
    endpoint: ControlEndpoint,
    connect_timeout: Duration,
    write_timeout: Duration,
    framing: F,
}

impl SocketRelay<IdleTimeoutFraming> {
    pub fn from_config(config: &ControlConfig) -> Result<Self, EndpointError> {
        let endpoint = config.endpoint.parse()?;
        Ok(Self::with_framing(
            endpoint,
            config,
            IdleTimeoutFraming::new(config.read_timeout()),
        ))
    }
}

impl<F: ResponseFraming> SocketRelay<F> {
    pub fn with_framing(endpoint: ControlEndpoint, config: &ControlConfig, framing: F) -> Self {
        Self {
            endpoint,
            connect_timeout: config.connect_timeout(),
            write_timeout: config.write_timeout(),
            framing,
        }
    }

    pub fn endpoint(&self) -> &ControlEndpoint {
        &self.endpoint
    }

    /// Run `command` against the control socket and return its output.
    pub async fn execute(&self, command: &str) -> Result<RelayResult> {
        let start = Instant::now();
        let result = self.relay(command).await;

        match &result {
            Ok(r) => {
                metrics::record_relay("ok", start, r.output.len());
                tracing::info!(
                    endpoint = %self.endpoint,
                    bytes = r.output.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Command relayed"
                );
            }
            Err(e) => {
                metrics::record_relay(e.kind(), start, 0);
                tracing::warn!(endpoint = %self.endpoint, error = %e, "Command relay failed");
            }
        }

        result
    }

    async fn relay(&self, command: &str) -> Result<RelayResult> {
        if !self.endpoint.is_present().await {
            return Err(RuntimeError::ServiceUnavailable(
                "HAProxy socket unavailable".to_string(),
            ));
        }

        tracing::debug!(endpoint = %self.endpoint, command = %command.trim_end(), "Relaying command");

        let mut conn = ControlConnection::open(&self.endpoint, self.connect_timeout).await?;
        conn.send(&framing::frame_command(command), self.write_timeout).await?;

        let bytes = self
            .framing
            .read_response(conn.stream_mut())
            .await
            .map_err(|e| RuntimeError::io("Unable to read from control socket", e))?;
        drop(conn);

        Ok(RelayResult {
            output: framing::decode_response(&bytes),
        })
    }
}
