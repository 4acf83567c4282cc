//! Endpoint handlers.
//!
//! Every mutating endpoint runs the auth gate before touching the socket or
//! the filesystem. Errors leave as `RuntimeError`, whose `IntoResponse` picks
//! the status code.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};
use crate::health::HealthStatus;
use crate::http::extract::ApiJson;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::stats::{self, ServerStat};

#[derive(Debug, Default, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub token: Option<String>,
    pub command: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub backend: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    #[serde(flatten)]
    pub status: HealthStatus,
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub success: bool,
    pub output: String,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub servers: Vec<ServerStat>,
}

fn observe<T>(route: &'static str, result: Result<T>) -> Result<T> {
    let status = match &result {
        Ok(_) => 200,
        Err(e) => e.status().as_u16(),
    };
    metrics::record_request(route, status);
    result
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.health.status().await;
    metrics::record_request("health", 200);
    Json(HealthResponse {
        status,
        success: true,
    })
}

pub async fn execute(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CommandRequest>,
) -> Result<Json<ExecuteResponse>, RuntimeError> {
    let result = async {
        state.auth.check(req.token.as_deref())?;
        state.relay.execute(&req.command).await
    }
    .await;

    let relayed = observe("execute", result)?;
    Ok(Json(ExecuteResponse {
        success: true,
        output: relayed.output,
    }))
}

pub async fn reload(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AuthRequest>,
) -> Result<Json<ReloadResponse>, RuntimeError> {
    let result = async {
        state.auth.check(req.token.as_deref())?;
        state.reload.trigger().await
    }
    .await;

    observe("reload", result)?;
    Ok(Json(ReloadResponse { success: true }))
}

pub async fn server_stats(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<StatsRequest>,
) -> Result<Json<StatsResponse>, RuntimeError> {
    let result = async {
        state.auth.check(req.token.as_deref())?;
        stats::fetch_server_stats(&*state.relay, req.backend.as_deref()).await
    }
    .await;

    let servers = observe("stats", result)?;
    Ok(Json(StatsResponse {
        success: true,
        servers,
    }))
}
