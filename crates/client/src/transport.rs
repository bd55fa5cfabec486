use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use threadpilot_core::config::ServerConfig;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("failed to build http transport: {0}")]
    Build(String),
    #[error("request to {url} could not be completed: {message}")]
    Request { url: String, message: String },
}

/// One outgoing plugin request. All operations POST; `body` is present only
/// for the text actions, which carry the working text as JSON.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRequest {
    /// Plugin-relative path, e.g. `/plugins/ai-actions/react/abc123`.
    pub url: String,
    pub body: Option<serde_json::Value>,
    pub correlation_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionResponse {
    pub status: u16,
}

impl ActionResponse {
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait ActionTransport: Send + Sync {
    async fn post(&self, request: ActionRequest) -> Result<ActionResponse, TransportError>;
}

/// Ambient request authentication, supplied by the caller rather than read
/// from any global state.
pub trait RequestDecorator: Send + Sync {
    fn decorate(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder;
}

#[derive(Default)]
pub struct NoopDecorator;

impl RequestDecorator for NoopDecorator {
    fn decorate(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
    }
}

pub struct SessionTokenDecorator {
    token: SecretString,
}

impl SessionTokenDecorator {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl RequestDecorator for SessionTokenDecorator {
    fn decorate(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.bearer_auth(self.token.expose_secret())
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    decorator: Arc<dyn RequestDecorator>,
}

impl HttpTransport {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        decorator: Arc<dyn RequestDecorator>,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| TransportError::Build(error.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url, decorator })
    }

    /// Builds a transport from server config, decorating requests with the
    /// session token when one is configured.
    pub fn from_config(config: &ServerConfig) -> Result<Self, TransportError> {
        let decorator: Arc<dyn RequestDecorator> = match &config.session_token {
            Some(token) => Arc::new(SessionTokenDecorator::new(token.clone())),
            None => Arc::new(NoopDecorator),
        };
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs), decorator)
    }
}

#[async_trait]
impl ActionTransport for HttpTransport {
    async fn post(&self, request: ActionRequest) -> Result<ActionResponse, TransportError> {
        let absolute = format!("{}{}", self.base_url, request.url);
        let mut builder = self.client.post(&absolute);
        builder = self.decorator.decorate(builder);
        builder = builder.header("X-Request-Id", request.correlation_id.as_str());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|error| TransportError::Request {
            url: request.url.clone(),
            message: error.to_string(),
        })?;

        Ok(ActionResponse { status: response.status().as_u16() })
    }
}
