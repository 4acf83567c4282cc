//! Per-call connection to the control socket.
//!
//! # Responsibilities
//! - Open a fresh stream for exactly one command
//! - Enforce connect and write deadlines
//! - Close the stream on every exit path (the stream is owned, dropping closes it)

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::{TcpStream, UnixStream};
use tokio::time::timeout;

use crate::error::{Result, RuntimeError};
use crate::relay::endpoint::ControlEndpoint;

/// Either transport the runtime API may be exposed on.
#[derive(Debug)]
pub enum ControlStream {
    Unix(UnixStream),
    Tcp(TcpStream),
}

impl AsyncRead for ControlStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ControlStream::Unix(s) => Pin::new(s).poll_read(cx, buf),
            ControlStream::Tcp(s) => Pin::new(s).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for ControlStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            ControlStream::Unix(s) => Pin::new(s).poll_write(cx, buf),
            ControlStream::Tcp(s) => Pin::new(s).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ControlStream::Unix(s) => Pin::new(s).poll_flush(cx),
            ControlStream::Tcp(s) => Pin::new(s).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ControlStream::Unix(s) => Pin::new(s).poll_shutdown(cx),
            ControlStream::Tcp(s) => Pin::new(s).poll_shutdown(cx),
        }
    }
}

/// A connection that lives for a single relay call.
#[derive(Debug)]
pub struct ControlConnection {
    stream: ControlStream,
}

impl ControlConnection {
    /// Connect to `endpoint` within `deadline`.
    pub async fn open(endpoint: &ControlEndpoint, deadline: Duration) -> Result<Self> {
        let connect = async {
            match endpoint {
                ControlEndpoint::Unix(path) => {
                    UnixStream::connect(path).await.map(ControlStream::Unix)
                }
                ControlEndpoint::Tcp(addr) => {
                    TcpStream::connect(addr.as_str()).await.map(ControlStream::Tcp)
                }
            }
        };

        let stream = match timeout(deadline, connect).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                return Err(RuntimeError::io(
                    format!("Unable to connect to control socket {}", endpoint),
                    e,
                ))
            }
            Err(_) => {
                return Err(RuntimeError::Timeout(format!(
                    "Timed out connecting to control socket {} after {:?}",
                    endpoint, deadline
                )))
            }
        };

        tracing::trace!(endpoint = %endpoint, "Control connection opened");
        Ok(Self { stream })
    }

    /// Write an already framed command.
    pub async fn send(&mut self, framed: &str, deadline: Duration) -> Result<()> {
        let write = async {
            self.stream.write_all(framed.as_bytes()).await?;
            self.stream.flush().await
        };

        match timeout(deadline, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(RuntimeError::io("Unable to send command to control socket", e)),
            Err(_) => Err(RuntimeError::Timeout(format!(
                "Timed out sending command to control socket after {:?}",
                deadline
            ))),
        }
    }

    pub fn stream_mut(&mut self) -> &mut ControlStream {
        &mut self.stream
    }
}

impl Drop for ControlConnection {
    fn drop(&mut self) {
        tracing::trace!("Control connection closed");
    }
}
