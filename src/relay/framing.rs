//! Command framing and response delimiting.
//!
//! The runtime API has no length prefix or terminator: the peer answers one
//! command and then closes or goes quiet. `IdleTimeoutFraming` approximates
//! message boundaries from that behaviour. Other strategies plug in through
//! `ResponseFraming` without touching the relay.

use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;

const READ_CHUNK: usize = 4096;

/// Strategy for deciding where a response ends.
pub trait ResponseFraming: Send + Sync {
    /// Read one complete response from `reader`.
    fn read_response<R>(&self, reader: &mut R) -> impl Future<Output = io::Result<Vec<u8>>> + Send
    where
        R: AsyncRead + Unpin + Send;
}

/// Reads until the peer closes or a single read stays idle past the deadline.
///
/// A deadline expiry ends the response and is not an error, so a peer that
/// answers nothing yields an empty response.
#[derive(Debug, Clone, Copy)]
pub struct IdleTimeoutFraming {
    read_timeout: Duration,
}

impl IdleTimeoutFraming {
    pub fn new(read_timeout: Duration) -> Self {
        Self { read_timeout }
    }
}

impl ResponseFraming for IdleTimeoutFraming {
    async fn read_response<R>(&self, reader: &mut R) -> io::Result<Vec<u8>>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut response = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            match timeout(self.read_timeout, reader.read(&mut chunk)).await {
                Err(_) => {
                    tracing::trace!(bytes = response.len(), "Control socket idle, ending response");
                    break;
                }
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => response.extend_from_slice(&chunk[..n]),
                Ok(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                Ok(Err(e)) => return Err(e),
            }
        }

        Ok(response)
    }
}

/// Terminate a command with exactly one newline.
pub fn frame_command(command: &str) -> String {
    let mut framed = String::with_capacity(command.len() + 1);
    framed.push_str(command.trim_end());
    framed.push('\n');
    framed
}

/// Decode a response, dropping invalid UTF-8 and surrounding whitespace.
pub fn decode_response(bytes: &[u8]) -> String {
    let text: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();
    text.trim().to_string()
}
