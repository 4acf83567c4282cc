//! Shared utilities for integration tests.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, UnixListener};
use tokio::sync::mpsc;

use runtime_api::{HttpServer, RuntimeConfig, Shutdown};

/// A running API server bound to an ephemeral port.
pub struct TestServer {
    pub url: String,
    pub dir: tempfile::TempDir,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub fn socket_path(&self) -> PathBuf {
        self.dir.path().join("admin.sock")
    }

    pub fn flag_path(&self) -> PathBuf {
        self.dir.path().join("haproxy-runtime").join("reload.flag")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server whose socket and flag live in a fresh temp dir.
pub async fn start_server(token: Option<&str>, read_timeout_ms: u64) -> TestServer {
    let dir = tempfile::tempdir().unwrap();

    let mut config = RuntimeConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.control.endpoint = dir.path().join("admin.sock").display().to_string();
    config.control.read_timeout_ms = read_timeout_ms;
    config.reload.flag_path = dir.path().join("haproxy-runtime").join("reload.flag");
    config.auth.token = token.map(str::to_owned);

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let server = HttpServer::new(Arc::new(config)).unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestServer { url, dir, shutdown }
}

/// Start a mock control socket. Each connection's command line is sent on
/// the returned channel and answered with whatever `reply` produces.
#[allow(dead_code)]
pub fn start_control_socket<F, Fut>(path: &Path, reply: F) -> mpsc::UnboundedReceiver<String>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let listener = UnixListener::bind(path).unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let reply = Arc::new(reply);

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let tx = tx.clone();
            let reply = reply.clone();
            tokio::spawn(async move {
                let (read, mut write) = socket.into_split();
                let mut line = String::new();
                if BufReader::new(read).read_line(&mut line).await.is_err() {
                    return;
                }
                let _ = tx.send(line.clone());

                match reply(line).await {
                    Reply::Close(bytes) => {
                        let _ = write.write_all(&bytes).await;
                    }
                    Reply::Hold(bytes, hold) => {
                        let _ = write.write_all(&bytes).await;
                        tokio::time::sleep(hold).await;
                    }
                }
            });
        }
    });

    rx
}

/// How the mock answers a command.
#[allow(dead_code)]
pub enum Reply {
    /// Write the bytes, then close the connection.
    Close(Vec<u8>),
    /// Write the bytes, then keep the connection open without writing.
    Hold(Vec<u8>, Duration),
}
