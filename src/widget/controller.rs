//! The chat widget controller.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::{AppConfig, DEFAULT_FALLBACK_REPLY, DEFAULT_GREETING};
use crate::session::{SessionContext, SessionId};
use crate::surface::{Message, RenderSurface};
use crate::transport::{ChatRequest, ChatTransport, DeliveryError, ResetRequest};

/// Default bound on a single request.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Texts and limits the controller works with.
#[derive(Debug, Clone)]
pub struct WidgetSettings {
    /// Shown on mount and as the only message after a reset.
    pub greeting: String,
    /// Shown instead of the bot's reply on any delivery failure.
    pub fallback_reply: String,
    /// Upper bound on each chat and reset call.
    pub request_timeout: Duration,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl WidgetSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            greeting: config.content.greeting.clone(),
            fallback_reply: config.content.fallback_reply.clone(),
            request_timeout: config.service.request_timeout(),
        }
    }
}

/// UI interaction lock.
#[derive(Debug)]
enum InteractionState {
    /// Input enabled.
    Idle,
    /// Input disabled, typing placeholder visible.
    AwaitingReply {
        seq: u64,
        cancel: CancellationToken,
    },
}

/// A chat request that has been rendered but not yet sent.
///
/// Produced by [`ChatWidget::begin_submit`]. Its outcome goes back through
/// [`ChatWidget::settle`].
#[derive(Debug)]
pub struct PendingReply {
    seq: u64,
    request: ChatRequest,
    cancel: CancellationToken,
    timeout: Duration,
}

impl PendingReply {
    /// Body that will be sent.
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// Send the request, bounded by the timeout and the cancellation token.
    pub async fn dispatch(self, transport: &dyn ChatTransport) -> SettledReply {
        let outcome = tokio::select! {
            () = self.cancel.cancelled() => Err(DeliveryError::Cancelled),
            result = tokio::time::timeout(self.timeout, transport.send_chat(&self.request)) => {
                match result {
                    Ok(outcome) => outcome,
                    Err(_elapsed) => Err(DeliveryError::Timeout(self.timeout)),
                }
            }
        };
        SettledReply {
            seq: self.seq,
            outcome,
        }
    }
}

/// Outcome of a dispatched chat request.
#[derive(Debug)]
pub struct SettledReply {
    pub seq: u64,
    pub outcome: Result<String, DeliveryError>,
}

/// Event-driven controller over a [`RenderSurface`].
///
/// Owns the session context and the interaction lock. All mutation happens
/// through `&mut self`, so one event loop drives it.
pub struct ChatWidget<S> {
    transport: Arc<dyn ChatTransport>,
    surface: S,
    session: SessionContext,
    settings: WidgetSettings,
    state: InteractionState,
    next_seq: u64,
}

impl<S> fmt::Debug for ChatWidget<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatWidget")
            .field("session", &self.session)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<S: RenderSurface> ChatWidget<S> {
    /// Build a widget with a freshly minted session.
    pub fn new(transport: Arc<dyn ChatTransport>, surface: S, settings: WidgetSettings) -> Self {
        Self {
            transport,
            surface,
            session: SessionContext::new(),
            settings,
            state: InteractionState::Idle,
            next_seq: 0,
        }
    }

    /// Replace the session context.
    #[must_use]
    pub fn with_session(mut self, session: SessionContext) -> Self {
        self.session = session;
        self
    }

    /// Render the greeting and focus the input, as on page load.
    pub fn mount(&mut self) {
        let greeting = Message::bot(self.settings.greeting.clone());
        self.surface.replace_log(&greeting);
        self.surface.set_input_enabled(true);
        self.surface.focus_input();
        info!(
            name: "widget.mounted",
            session_id = %self.session.current(),
            "Chat widget mounted"
        );
    }

    pub fn session_id(&self) -> &SessionId {
        self.session.current()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        matches!(self.state, InteractionState::AwaitingReply { .. })
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn transport(&self) -> Arc<dyn ChatTransport> {
        Arc::clone(&self.transport)
    }

    /// Render a submission and move to awaiting-reply.
    ///
    /// Returns `None` when a reply is already awaited, leaving the surface
    /// alone, or when the text is blank after trimming, in which case the
    /// input is only re-focused.
    pub fn begin_submit(&mut self, text: &str) -> Option<PendingReply> {
        if self.is_awaiting_reply() {
            debug!(
                name: "widget.submit.ignored",
                reason = "awaiting_reply",
                "Input is disabled; submission dropped"
            );
            return None;
        }

        let message = text.trim();
        if message.is_empty() {
            debug!(name: "widget.submit.ignored", reason = "blank", "Blank submission dropped");
            self.surface.focus_input();
            return None;
        }

        self.surface.append_message(&Message::user(message));
        self.surface.clear_input();
        self.surface.set_input_enabled(false);
        self.surface.show_typing();

        self.next_seq += 1;
        let seq = self.next_seq;
        let cancel = CancellationToken::new();
        self.state = InteractionState::AwaitingReply {
            seq,
            cancel: cancel.clone(),
        };

        info!(
            name: "widget.submit.sent",
            session_id = %self.session.current(),
            seq,
            chars = message.chars().count(),
            "Submitting message"
        );

        Some(PendingReply {
            seq,
            request: ChatRequest {
                message: message.to_string(),
                session_id: self.session.current().clone(),
            },
            cancel,
            timeout: self.settings.request_timeout,
        })
    }

    /// Render the outcome of the awaited request and return to idle.
    ///
    /// Outcomes of requests that are no longer awaited are discarded and
    /// `false` is returned.
    pub fn settle(&mut self, settled: SettledReply) -> bool {
        match &self.state {
            InteractionState::AwaitingReply { seq, .. } if *seq == settled.seq => {}
            _ => {
                debug!(
                    name: "widget.reply.stale",
                    seq = settled.seq,
                    "Discarding reply to a request that is no longer awaited"
                );
                return false;
            }
        }
        self.state = InteractionState::Idle;

        let reply = match settled.outcome {
            Ok(text) => {
                info!(name: "widget.reply.received", seq = settled.seq, "Reply received");
                text
            }
            Err(e) => {
                error!(
                    name: "widget.reply.failed",
                    seq = settled.seq,
                    error = %e,
                    "Chat request failed"
                );
                self.settings.fallback_reply.clone()
            }
        };

        self.surface.hide_typing();
        self.surface.append_message(&Message::bot(reply));
        self.surface.set_input_enabled(true);
        self.surface.focus_input();
        true
    }

    /// Submit a message and render the reply once it settles.
    ///
    /// Returns whether a request was made.
    pub async fn submit_message(&mut self, text: &str) -> bool {
        let Some(pending) = self.begin_submit(text) else {
            return false;
        };
        let transport = Arc::clone(&self.transport);
        let settled = pending.dispatch(transport.as_ref()).await;
        self.settle(settled)
    }

    /// Cancel the awaited request, if any. It settles as a delivery failure.
    pub fn cancel_in_flight(&self) -> bool {
        match &self.state {
            InteractionState::AwaitingReply { seq, cancel } => {
                info!(name: "widget.submit.cancelled", seq, "Cancelling pending reply");
                cancel.cancel();
                true
            }
            InteractionState::Idle => false,
        }
    }

    /// Start a new conversation.
    ///
    /// Any awaited reply is abandoned. The server is told to discard the old
    /// session, then a new identifier replaces it and the log is reset to
    /// the greeting. The clear happens whatever the reset call's outcome.
    pub async fn reset_conversation(&mut self) {
        if let InteractionState::AwaitingReply { seq, cancel } =
            std::mem::replace(&mut self.state, InteractionState::Idle)
        {
            cancel.cancel();
            self.surface.hide_typing();
            self.surface.set_input_enabled(true);
            info!(name: "widget.reply.abandoned", seq, "Abandoning pending reply for new chat");
        }

        let request = ResetRequest {
            session_id: self.session.current().clone(),
        };
        let timeout = self.settings.request_timeout;
        match tokio::time::timeout(timeout, self.transport.reset(&request)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(name: "widget.reset.failed", error = %e, "Reset call failed");
            }
            Err(_elapsed) => {
                warn!(name: "widget.reset.failed", timeout = ?timeout, "Reset call timed out");
            }
        }

        let retired = self.session.renew();
        info!(
            name: "widget.reset",
            retired = %retired,
            session_id = %self.session.current(),
            "Started new conversation"
        );

        let greeting = Message::bot(self.settings.greeting.clone());
        self.surface.replace_log(&greeting);
        self.surface.focus_input();
    }
}
