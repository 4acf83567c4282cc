//! Typed client for the HAProxy Runtime API.

pub mod client;

pub use client::{ClientError, RuntimeClient};
