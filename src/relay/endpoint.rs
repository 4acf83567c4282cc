//! Control endpoint addressing.
//!
//! HAProxy exposes its runtime API either as a Unix socket
//! (`stats socket /var/run/haproxy/admin.sock`) or on TCP
//! (`stats socket ipv4@0.0.0.0:9999`). Both are accepted here.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

const UNIX_SCHEME: &str = "unix://";
const TCP_SCHEME: &str = "tcp://";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("endpoint is empty")]
    Empty,

    #[error("'{0}' has no socket path")]
    MissingPath(String),

    #[error("'{0}' must be of the form tcp://host:port")]
    InvalidTcp(String),
}

/// Where the control socket lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEndpoint {
    Unix(PathBuf),
    /// `host:port`, resolved at connect time.
    Tcp(String),
}

impl ControlEndpoint {
    /// Whether the endpoint is present, without connecting.
    ///
    /// Unix endpoints must exist as a filesystem entry; access errors count
    /// as absent. TCP endpoints have nothing to look at and are reported
    /// present.
    pub async fn is_present(&self) -> bool {
        match self {
            ControlEndpoint::Unix(path) => tokio::fs::try_exists(path).await.unwrap_or(false),
            ControlEndpoint::Tcp(_) => true,
        }
    }
}

impl FromStr for ControlEndpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EndpointError::Empty);
        }

        if let Some(path) = s.strip_prefix(UNIX_SCHEME) {
            if path.is_empty() {
                return Err(EndpointError::MissingPath(s.to_string()));
            }
            return Ok(ControlEndpoint::Unix(PathBuf::from(path)));
        }

        if let Some(addr) = s.strip_prefix(TCP_SCHEME) {
            let valid = addr
                .rsplit_once(':')
                .map(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok())
                .unwrap_or(false);
            if !valid {
                return Err(EndpointError::InvalidTcp(s.to_string()));
            }
            return Ok(ControlEndpoint::Tcp(addr.to_string()));
        }

        Ok(ControlEndpoint::Unix(PathBuf::from(s)))
    }
}

impl fmt::Display for ControlEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlEndpoint::Unix(path) => write!(f, "{}{}", UNIX_SCHEME, path.display()),
            ControlEndpoint::Tcp(addr) => write!(f, "{}{}", TCP_SCHEME, addr),
        }
    }
}
