//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, timeout)
//! - Bind server to listener and drain on shutdown

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::AuthGate;
use crate::config::RuntimeConfig;
use crate::health::HealthProbe;
use crate::http::handlers;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::shutdown;
use crate::relay::{EndpointError, SocketRelay};
use crate::reload::ReloadSignal;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthGate,
    pub relay: Arc<SocketRelay>,
    pub reload: Arc<ReloadSignal>,
    pub health: Arc<HealthProbe>,
}

impl AppState {
    /// Build every component from the loaded configuration.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, EndpointError> {
        let relay = SocketRelay::from_config(&config.control)?;
        let health = HealthProbe::new(relay.endpoint().clone(), config.reload.flag_path.clone());

        Ok(Self {
            auth: AuthGate::from_config(&config.auth),
            relay: Arc::new(relay),
            reload: Arc::new(ReloadSignal::from_config(&config.reload)),
            health: Arc::new(health),
        })
    }
}

/// HTTP front of the runtime API.
pub struct HttpServer {
    router: Router,
    config: Arc<RuntimeConfig>,
    auth: AuthGate,
}

impl HttpServer {
    pub fn new(config: Arc<RuntimeConfig>) -> Result<Self, EndpointError> {
        let state = AppState::from_config(&config)?;
        let auth = state.auth.clone();
        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            auth,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RuntimeConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/execute", post(handlers::execute))
            .route("/reload", post(handlers::reload))
            .route("/stats", post(handlers::server_stats))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(propagate_request_id_layer())
                    .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The fully layered router, for serving or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until `shutdown_rx` fires, then let in-flight requests finish.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            endpoint = %self.config.control.endpoint,
            flag_path = %self.config.reload.flag_path.display(),
            auth = self.auth.is_enforced(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::path::Path;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::UnixListener;
    use tower::ServiceExt;

    fn server(dir: &Path, token: Option<&str>) -> HttpServer {
        let mut config = RuntimeConfig::default();
        config.control.endpoint = dir.join("admin.sock").display().to_string();
        config.control.read_timeout_ms = 200;
        config.reload.flag_path = dir.join("runtime").join("reload.flag");
        config.auth.token = token.map(str::to_owned);
        HttpServer::new(Arc::new(config)).unwrap()
    }

    async fn call(server: &HttpServer, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_absent_resources() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(dir.path(), Some("secret"));

        let (status, body) = call(&server, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "admin_socket": false, "reload_flag": false, "success": true }));
    }

    #[tokio::test]
    async fn execute_relays_in_open_mode() {
        let dir = tempfile::tempdir().unwrap();
        let listener = UnixListener::bind(dir.path().join("admin.sock")).unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 64];
            let _ = socket.read(&mut buf).await.unwrap();
            socket.write_all(b"HAProxy version 2.8\n").await.unwrap();
        });
        let server = server(dir.path(), None);

        let (status, body) = call(&server, "POST", "/execute", Some(json!({ "command": "show info" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "output": "HAProxy version 2.8" }));
    }

    #[tokio::test]
    async fn wrong_token_is_forbidden_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("admin.sock");
        let listener = UnixListener::bind(&socket_path).unwrap();
        let server = server(dir.path(), Some("secret"));

        let (status, body) = call(
            &server,
            "POST",
            "/execute",
            Some(json!({ "token": "wrong", "command": "show info" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["detail"], "Invalid token");

        let (status, _) = call(&server, "POST", "/reload", Some(json!({}))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(&server, "POST", "/stats", Some(json!({ "token": "nope" }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        assert!(!dir.path().join("runtime").exists());
        let accepted = tokio::time::timeout(Duration::from_millis(50), listener.accept()).await;
        assert!(accepted.is_err(), "control socket must not be contacted");
    }

    #[tokio::test]
    async fn execute_without_socket_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(dir.path(), None);

        let (status, body) = call(&server, "POST", "/execute", Some(json!({ "command": "show info" }))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "success": false, "detail": "HAProxy socket unavailable" }));
    }

    #[tokio::test]
    async fn reload_creates_flag() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(dir.path(), Some("secret"));

        let (status, body) = call(&server, "POST", "/reload", Some(json!({ "token": "secret" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("runtime").join("reload.flag")).unwrap(),
            "reload\n"
        );

        let (_, body) = call(&server, "GET", "/health", None).await;
        assert_eq!(body["reload_flag"], true);
    }

    #[tokio::test]
    async fn missing_command_is_rejected_before_relay() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(dir.path(), None);

        let (status, body) = call(&server, "POST", "/execute", Some(json!({ "token": "x" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("missing field `command`"), "{detail}");
    }

    #[tokio::test]
    async fn empty_body_is_rejected_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(dir.path(), None);

        let (status, body) = call(&server, "POST", "/reload", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["detail"].as_str().unwrap().starts_with("Failed to parse"));
        assert!(!dir.path().join("runtime").exists());
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(dir.path(), None);

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));

        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }
}
