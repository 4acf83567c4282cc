//! HTTP bridge to an HAProxy runtime control socket.
//!
//! Relays administrative commands to the control socket, writes the reload
//! flag watched by an external reloader, and reports whether both exist.

pub mod auth;
pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod reload;
pub mod stats;

pub use config::RuntimeConfig;
pub use error::RuntimeError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
