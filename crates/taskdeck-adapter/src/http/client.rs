/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client ready for RPC calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
[UPDATE]: Switch from per-endpoint GET builders to Connect JSON POST procedures
*/

use crate::http::{Result, TaskdeckError};
use crate::types::ConnectErrorBody;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Base URL used when no endpoint is configured
pub const DEFAULT_BASE_URL: &str = "http://task:80";

/// Fully-qualified service name prefixed to every procedure path
const SERVICE_PATH: &str = "cloud.v1.TaskManagementService";

const PROTOCOL_VERSION_HEADER: &str = "connect-protocol-version";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the remote task management service
#[derive(Debug, Clone)]
pub struct TaskServiceClient {
    http_client: Client,
    base_url: Url,
}

impl TaskServiceClient {
    /// Create a new client against the default endpoint
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration against the default endpoint
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a new client with custom configuration and endpoint.
    ///
    /// Endpoints without a scheme are treated as plain `http://` hosts.
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Endpoint this client talks to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for a procedure
    fn procedure_url(&self, method: &str) -> std::result::Result<Url, url::ParseError> {
        self.base_url.join(&format!("{SERVICE_PATH}/{method}"))
    }

    /// Build request builder for a unary procedure
    pub(crate) fn rpc_request(&self, method: &str) -> Result<RequestBuilder> {
        let url = self.procedure_url(method)?;
        tracing::debug!(method, %url, "rpc request");
        Ok(self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(PROTOCOL_VERSION_HEADER, HeaderValue::from_static("1")))
    }

    /// Send a unary procedure call and decode the JSON reply
    pub(crate) async fn send_rpc<Req, Resp>(&self, method: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let builder = self.rpc_request(method)?.json(body);
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(method, status = status.as_u16(), "rpc returned error status");
            let (code, message) = match serde_json::from_str::<ConnectErrorBody>(&text) {
                Ok(body) => (body.code, body.message),
                Err(_) => (String::from("unknown"), text),
            };
            return Err(TaskdeckError::api_error(status, code, message));
        }

        // Connect replies with an empty body when every field holds its zero value.
        let payload = if text.trim().is_empty() { "{}" } else { text.as_str() };
        Ok(serde_json::from_str(payload)?)
    }
}

fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskdeckError::Config("server endpoint is empty".to_string()));
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    // A trailing slash keeps any path prefix when procedures are joined.
    let with_slash = if with_scheme.ends_with('/') {
        with_scheme
    } else {
        format!("{with_scheme}/")
    };

    Ok(Url::parse(&with_slash)?)
}
