//! Rendering surfaces for the chat widget.
//!
//! The controller never touches a concrete UI. It drives a [`RenderSurface`],
//! which stands in for the message list, input box and send button of the
//! page.
//!
//! - [`MessageLog`]: in-memory render tree, shareable by handle
//! - [`TerminalSurface`]: line-oriented terminal output

mod log;
mod terminal;

pub use log::{LogNode, MessageLog, TYPING_INDICATOR_ID};
pub use terminal::TerminalSurface;

use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Typed by the person using the widget.
    User,
    /// Returned by the chat service, or the canned greeting/fallback.
    Bot,
}

/// A plain-text chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Bot,
            content: content.into(),
        }
    }
}

/// The visual surface the controller renders into.
///
/// All operations are infallible from the controller's point of view.
pub trait RenderSurface: Send {
    /// Append a message to the end of the log and keep it in view.
    fn append_message(&mut self, message: &Message);

    /// Show the typing placeholder. Never creates a second one.
    fn show_typing(&mut self);

    /// Remove the typing placeholder if present.
    fn hide_typing(&mut self);

    /// Replace the whole log with a single message.
    fn replace_log(&mut self, message: &Message);

    /// Empty the input control.
    fn clear_input(&mut self);

    /// Enable or disable both the input control and the send action.
    fn set_input_enabled(&mut self, enabled: bool);

    /// Move keyboard focus to the input control.
    fn focus_input(&mut self);
}
