//! Error taxonomy shared by every component.
//!
//! Components return `Result<T, RuntimeError>`. The mapping to an HTTP
//! status lives only in the `IntoResponse` impl below.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type Result<T, E = RuntimeError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Request body could not be read as the expected JSON document.
    #[error("{detail}")]
    BadRequest { status: StatusCode, detail: String },

    /// Credential missing or wrong. Nothing was touched.
    #[error("{0}")]
    Forbidden(String),

    /// Control socket is not present. No connection was attempted.
    #[error("{0}")]
    ServiceUnavailable(String),

    /// The connect or write deadline on the control connection expired.
    #[error("{0}")]
    Timeout(String),

    /// Connecting to or talking with the control socket failed.
    #[error("{detail}: {source}")]
    Io {
        detail: String,
        #[source]
        source: std::io::Error,
    },

    /// Local failure, such as the reload flag not being writable.
    #[error("{detail}: {source}")]
    Internal {
        detail: String,
        #[source]
        source: std::io::Error,
    },
}

impl RuntimeError {
    pub fn io(detail: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            detail: detail.into(),
            source,
        }
    }

    pub fn internal(detail: impl Into<String>, source: std::io::Error) -> Self {
        Self::Internal {
            detail: detail.into(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RuntimeError::BadRequest { status, .. } => *status,
            RuntimeError::Forbidden(_) => StatusCode::FORBIDDEN,
            RuntimeError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            RuntimeError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            RuntimeError::Io { .. } => StatusCode::BAD_GATEWAY,
            RuntimeError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::BadRequest { .. } => "bad_request",
            RuntimeError::Forbidden(_) => "forbidden",
            RuntimeError::ServiceUnavailable(_) => "unavailable",
            RuntimeError::Timeout(_) => "timeout",
            RuntimeError::Io { .. } => "io",
            RuntimeError::Internal { .. } => "internal",
        }
    }
}

impl IntoResponse for RuntimeError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "detail": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}
