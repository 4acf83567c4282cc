//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, request span)
//!     → extract.rs (JSON body, rejections in the API error shape)
//!     → handlers.rs (auth gate, then relay / reload / health / stats)
//!     → error.rs (RuntimeError → status + JSON detail)
//!     → Send to client
//! ```

pub mod extract;
pub mod handlers;
pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
