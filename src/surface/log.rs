//! In-memory render tree.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Message, MessageRole, RenderSurface};

/// Fixed element id of the typing placeholder node.
pub const TYPING_INDICATOR_ID: &str = "typing-indicator";

/// One node in the message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogNode {
    /// A rendered message. Bot messages carry the avatar, if configured.
    Message {
        role: MessageRole,
        content: String,
        avatar: Option<String>,
    },
    /// The transient typing placeholder.
    Typing,
}

impl LogNode {
    /// Element id of the node, if it has one.
    #[must_use]
    pub fn element_id(&self) -> Option<&'static str> {
        match self {
            Self::Typing => Some(TYPING_INDICATOR_ID),
            Self::Message { .. } => None,
        }
    }
}

#[derive(Debug)]
struct LogState {
    nodes: Vec<LogNode>,
    avatar: Option<String>,
    draft: String,
    input_enabled: bool,
    focused: bool,
    scrolled_to_bottom: bool,
}

/// The widget's message list and input control state.
///
/// Cloning yields another handle onto the same tree, so an embedding layer
/// can read what the controller rendered.
#[derive(Debug, Clone)]
pub struct MessageLog {
    inner: Arc<RwLock<LogState>>,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLog {
    /// Create an empty log whose bot messages have no avatar.
    #[must_use]
    pub fn new() -> Self {
        Self::with_avatar(None)
    }

    /// Create an empty log whose bot messages show the given avatar.
    #[must_use]
    pub fn with_avatar(avatar: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(LogState {
                nodes: Vec::new(),
                avatar,
                draft: String::new(),
                input_enabled: true,
                focused: false,
                scrolled_to_bottom: true,
            })),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, LogState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LogState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every node, in display order.
    #[must_use]
    pub fn nodes(&self) -> Vec<LogNode> {
        self.read().nodes.clone()
    }

    /// Snapshot of the rendered messages, skipping the placeholder.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.read()
            .nodes
            .iter()
            .filter_map(|node| match node {
                LogNode::Message { role, content, .. } => Some(Message {
                    role: *role,
                    content: content.clone(),
                }),
                LogNode::Typing => None,
            })
            .collect()
    }

    /// Number of rendered messages with the given role.
    #[must_use]
    pub fn count(&self, role: MessageRole) -> usize {
        self.read()
            .nodes
            .iter()
            .filter(|node| matches!(node, LogNode::Message { role: r, .. } if *r == role))
            .count()
    }

    /// The most recent message, if any.
    #[must_use]
    pub fn last_message(&self) -> Option<Message> {
        self.messages().pop()
    }

    /// Number of typing placeholder nodes. Zero or one.
    #[must_use]
    pub fn typing_count(&self) -> usize {
        self.read()
            .nodes
            .iter()
            .filter(|node| node.element_id() == Some(TYPING_INDICATOR_ID))
            .count()
    }

    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.typing_count() > 0
    }

    #[must_use]
    pub fn input_enabled(&self) -> bool {
        self.read().input_enabled
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.read().focused
    }

    #[must_use]
    pub fn is_scrolled_to_bottom(&self) -> bool {
        self.read().scrolled_to_bottom
    }

    /// Current text in the input control.
    #[must_use]
    pub fn draft(&self) -> String {
        self.read().draft.clone()
    }

    /// Type into the input control. Ignored while the control is disabled.
    pub fn set_draft(&self, text: impl Into<String>) -> bool {
        let mut state = self.write();
        if !state.input_enabled {
            return false;
        }
        state.draft = text.into();
        true
    }

    /// Mark the list as scrolled away from the newest message.
    pub fn scroll_up(&self) {
        self.write().scrolled_to_bottom = false;
    }
}

impl LogState {
    fn message_node(&self, message: &Message) -> LogNode {
        let avatar = match message.role {
            MessageRole::Bot => self.avatar.clone(),
            MessageRole::User => None,
        };
        LogNode::Message {
            role: message.role,
            content: message.content.clone(),
            avatar,
        }
    }
}

impl RenderSurface for MessageLog {
    fn append_message(&mut self, message: &Message) {
        let mut state = self.write();
        let node = state.message_node(message);
        state.nodes.push(node);
        state.scrolled_to_bottom = true;
    }

    fn show_typing(&mut self) {
        let mut state = self.write();
        if !state.nodes.iter().any(|node| *node == LogNode::Typing) {
            state.nodes.push(LogNode::Typing);
        }
        state.scrolled_to_bottom = true;
    }

    fn hide_typing(&mut self) {
        self.write().nodes.retain(|node| *node != LogNode::Typing);
    }

    fn replace_log(&mut self, message: &Message) {
        let mut state = self.write();
        let node = state.message_node(message);
        state.nodes = vec![node];
        state.scrolled_to_bottom = true;
    }

    fn clear_input(&mut self) {
        self.write().draft.clear();
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        let mut state = self.write();
        state.input_enabled = enabled;
        if !enabled {
            state.focused = false;
        }
    }

    fn focus_input(&mut self) {
        let mut state = self.write();
        // A disabled control cannot take focus.
        state.focused = state.input_enabled;
    }
}
