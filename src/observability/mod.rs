//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! HTTP layer adds:
//!     → request spans (tower-http TraceLayer)
//!     → x-request-id correlation (http/request.rs)
//! ```

pub mod logging;
pub mod metrics;
