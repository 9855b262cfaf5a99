//! HTTP transport for the chat service.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{ChatReply, ChatRequest, ChatTransport, DeliveryError, ResetRequest, Result};
use crate::config::ServiceConfig;

/// Talks to the chat service over JSON HTTP.
///
/// # Example
///
/// ```rust,no_run
/// use chat_widget::transport::{ChatRequest, ChatTransport, HttpTransport};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpTransport::new("http://127.0.0.1:5000")?;
/// let _reply = transport
///     .send_chat(&ChatRequest {
///         message: "Hello!".into(),
///         session_id: "session_1_abc".into(),
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    chat_url: Url,
    reset_url: Url,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport using the default `/chat` and `/new-chat` paths.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_paths(base_url, "/chat", "/new-chat")
    }

    /// Create a transport with explicit endpoint paths.
    pub fn with_paths(
        base_url: impl AsRef<str>,
        chat_path: &str,
        reset_path: &str,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self {
            chat_url: base_url.join(chat_path)?,
            reset_url: base_url.join(reset_path)?,
            http: reqwest::Client::new(),
        })
    }

    /// Create a transport from the service section of the configuration.
    pub fn from_config(service: &ServiceConfig) -> Result<Self> {
        Self::with_paths(&service.base_url, &service.chat_path, &service.reset_path)
    }

    /// Resolved chat endpoint.
    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    /// Resolved reset endpoint.
    pub fn reset_url(&self) -> &Url {
        &self.reset_url
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send_chat(&self, request: &ChatRequest) -> Result<String> {
        let response = self
            .http
            .post(self.chat_url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatReply = serde_json::from_str(&body)?;
        Ok(reply.response)
    }

    async fn reset(&self, request: &ResetRequest) -> Result<()> {
        let response = self
            .http
            .post(self.reset_url.clone())
            .json(request)
            .send()
            .await?;

        debug!(
            name: "transport.reset.answered",
            status = response.status().as_u16(),
            "Reset endpoint answered"
        );
        Ok(())
    }
}
