//! Presence probe for the two external channels.
//!
//! Reports whether the control socket and the reload flag exist. It never
//! connects to the socket nor reads the flag, needs no credential, and
//! cannot fail: anything unreadable is reported as absent.

use std::path::PathBuf;

use serde::Serialize;

use crate::relay::ControlEndpoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    #[serde(rename = "admin_socket")]
    pub socket_present: bool,
    #[serde(rename = "reload_flag")]
    pub flag_present: bool,
}

#[derive(Debug, Clone)]
pub struct HealthProbe {
    endpoint: ControlEndpoint,
    flag_path: PathBuf,
}

impl HealthProbe {
    pub fn new(endpoint: ControlEndpoint, flag_path: impl Into<PathBuf>) -> Self {
        Self {
            endpoint,
            flag_path: flag_path.into(),
        }
    }

    pub async fn status(&self) -> HealthStatus {
        HealthStatus {
            socket_present: self.endpoint.is_present().await,
            flag_present: tokio::fs::try_exists(&self.flag_path).await.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_each_path_independently() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("admin.sock");
        let flag = dir.path().join("reload.flag");
        let probe = HealthProbe::new(ControlEndpoint::Unix(socket.clone()), &flag);

        assert_eq!(
            probe.status().await,
            HealthStatus { socket_present: false, flag_present: false }
        );

        std::fs::write(&flag, "reload\n").unwrap();
        assert_eq!(
            probe.status().await,
            HealthStatus { socket_present: false, flag_present: true }
        );

        std::fs::remove_file(&flag).unwrap();
        std::fs::write(&socket, b"").unwrap();
        assert_eq!(
            probe.status().await,
            HealthStatus { socket_present: true, flag_present: false }
        );
    }

    #[tokio::test]
    async fn never_connects_to_the_socket() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("admin.sock");
        let listener = tokio::net::UnixListener::bind(&socket).unwrap();

        let probe = HealthProbe::new(ControlEndpoint::Unix(socket), dir.path().join("reload.flag"));
        assert!(probe.status().await.socket_present);

        let accepted = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            listener.accept(),
        )
        .await;
        assert!(accepted.is_err(), "probe must not open a connection");
    }

    #[test]
    fn serializes_with_wire_names() {
        let json = serde_json::to_value(HealthStatus { socket_present: true, flag_present: false }).unwrap();
        assert_eq!(json, serde_json::json!({ "admin_socket": true, "reload_flag": false }));
    }
}
