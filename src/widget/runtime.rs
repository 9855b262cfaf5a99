//! Single event loop driving a [`ChatWidget`].
//!
//! Commands from the UI and settled replies are both events on the same
//! loop. The chat request itself runs on a spawned task so the loop keeps
//! receiving commands while a reply is awaited; submissions that arrive in
//! that window are dropped, as the input is disabled.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use super::controller::{ChatWidget, SettledReply};
use crate::surface::RenderSurface;

/// UI events delivered to the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetCommand {
    /// The user submitted the input form.
    Submit(String),
    /// The user clicked "new chat".
    NewChat,
    /// Abort the reply currently awaited.
    Cancel,
    /// Stop the loop and hand the widget back.
    Shutdown,
}

/// Sending side of a widget's command queue.
#[derive(Debug, Clone)]
pub struct WidgetHandle {
    tx: mpsc::UnboundedSender<WidgetCommand>,
}

impl WidgetHandle {
    /// Create a handle and the receiver to pass to [`run_widget`].
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<WidgetCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue a command. Returns `false` once the loop has stopped.
    pub fn send(&self, command: WidgetCommand) -> bool {
        self.tx.send(command).is_ok()
    }

    pub fn submit(&self, text: impl Into<String>) -> bool {
        self.send(WidgetCommand::Submit(text.into()))
    }

    pub fn new_chat(&self) -> bool {
        self.send(WidgetCommand::NewChat)
    }

    pub fn cancel(&self) -> bool {
        self.send(WidgetCommand::Cancel)
    }

    pub fn shutdown(&self) -> bool {
        self.send(WidgetCommand::Shutdown)
    }
}

/// Spawn [`run_widget`] on the current runtime.
pub fn spawn_widget<S>(widget: ChatWidget<S>) -> (WidgetHandle, JoinHandle<ChatWidget<S>>)
where
    S: RenderSurface + 'static,
{
    let (handle, commands) = WidgetHandle::channel();
    let task = tokio::spawn(run_widget(widget, commands));
    (handle, task)
}

/// Process commands until [`WidgetCommand::Shutdown`] or every handle is
/// dropped, then return the widget.
pub async fn run_widget<S>(
    mut widget: ChatWidget<S>,
    mut commands: mpsc::UnboundedReceiver<WidgetCommand>,
) -> ChatWidget<S>
where
    S: RenderSurface + 'static,
{
    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<SettledReply>();

    loop {
        tokio::select! {
            Some(settled) = settled_rx.recv() => {
                widget.settle(settled);
            }
            command = commands.recv() => match command {
                Some(WidgetCommand::Submit(text)) => {
                    if let Some(pending) = widget.begin_submit(&text) {
                        let transport = widget.transport();
                        let settled_tx = settled_tx.clone();
                        tokio::spawn(async move {
                            let settled = pending.dispatch(transport.as_ref()).await;
                            // The loop may already be gone; nothing left to render into.
                            let _ = settled_tx.send(settled);
                        });
                    }
                }
                Some(WidgetCommand::NewChat) => widget.reset_conversation().await,
                Some(WidgetCommand::Cancel) => {
                    widget.cancel_in_flight();
                }
                Some(WidgetCommand::Shutdown) | None => break,
            },
        }
    }

    info!(
        name: "widget.runtime.stopped",
        session_id = %widget.session_id(),
        "Widget event loop stopped"
    );
    widget
}
