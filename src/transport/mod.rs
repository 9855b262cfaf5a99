//! Chat service transport.
//!
//! The chat service is a black box with two operations:
//!
//! - `POST /chat` with [`ChatRequest`], answering [`ChatReply`]
//! - `POST /new-chat` with [`ResetRequest`], whose answer is ignored
//!
//! [`ChatTransport`] is the seam the widget talks through. [`HttpTransport`]
//! is the production implementation; tests plug in scripted ones.

mod error;
mod http;

pub use error::{DeliveryError, Result};
pub use http::HttpTransport;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::session::SessionId;

/// Body of a chat submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message, already trimmed.
    pub message: String,
    /// Session the message belongs to.
    pub session_id: SessionId,
}

/// Body of a successful chat reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Bot reply text.
    pub response: String,
}

/// Body of a reset notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetRequest {
    /// Session whose server-side conversation should be discarded.
    pub session_id: SessionId,
}

/// Outbound operations the widget needs from the chat service.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Submit a message and return the bot's reply text.
    async fn send_chat(&self, request: &ChatRequest) -> Result<String>;

    /// Ask the service to discard the conversation for a session.
    ///
    /// Only failure to reach the service is reported; the response itself
    /// is never inspected.
    async fn reset(&self, request: &ResetRequest) -> Result<()>;
}
