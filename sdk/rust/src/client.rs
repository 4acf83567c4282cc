use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("runtime API returned {status}: {detail}")]
    Api { status: StatusCode, detail: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Health {
    pub admin_socket: bool,
    pub reload_flag: bool,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerStat {
    pub backend: String,
    pub server: String,
    pub status: String,
    pub check_status: String,
    pub last_check: String,
    pub last_change: Option<u64>,
}

#[derive(Serialize)]
struct CommandBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
    command: &'a str,
}

#[derive(Serialize)]
struct TokenBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backend: Option<&'a str>,
}

#[derive(Deserialize)]
struct OutputBody {
    output: String,
}

#[derive(Deserialize)]
struct StatsBody {
    servers: Vec<ServerStat>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

pub struct RuntimeClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RuntimeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Send `token` with every authenticated call.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub async fn health(&self) -> Result<Health, ClientError> {
        let resp = self.client.get(format!("{}/health", self.base_url)).send().await?;
        Self::decode(resp).await
    }

    /// Relay one command and return its trimmed output.
    pub async fn execute(&self, command: &str) -> Result<String, ClientError> {
        let body = CommandBody {
            token: self.token.as_deref(),
            command,
        };
        let resp = self
            .client
            .post(format!("{}/execute", self.base_url))
            .json(&body)
            .send()
            .await?;
        let out: OutputBody = Self::decode(resp).await?;
        Ok(out.output)
    }

    pub async fn reload(&self) -> Result<(), ClientError> {
        let body = TokenBody {
            token: self.token.as_deref(),
            backend: None,
        };
        let resp = self
            .client
            .post(format!("{}/reload", self.base_url))
            .json(&body)
            .send()
            .await?;
        let _: serde_json::Value = Self::decode(resp).await?;
        Ok(())
    }

    pub async fn stats(&self, backend: Option<&str>) -> Result<Vec<ServerStat>, ClientError> {
        let body = TokenBody {
            token: self.token.as_deref(),
            backend,
        };
        let resp = self
            .client
            .post(format!("{}/stats", self.base_url))
            .json(&body)
            .send()
            .await?;
        let stats: StatsBody = Self::decode(resp).await?;
        Ok(stats.servers)
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await?;
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .map(|e| e.detail)
                .unwrap_or(text);
            return Err(ClientError::Api { status, detail });
        }
        Ok(resp.json().await?)
    }
}
