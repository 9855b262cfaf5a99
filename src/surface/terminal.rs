//! Line-oriented terminal rendering.

use std::io::Write;
use std::path::Path;

use tracing::warn;

use super::{Message, MessageRole, RenderSurface};

/// ANSI: return to column 0 and erase the line.
const ERASE_LINE: &str = "\r\x1b[2K";

/// ANSI: clear the screen and home the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const PROMPT: &str = "> ";

/// Renders the chat transcript to a terminal-like writer.
///
/// The typing placeholder is a single line that gets erased when the reply
/// arrives. User messages are never printed: the terminal already echoed
/// them.
#[derive(Debug)]
pub struct TerminalSurface<W> {
    out: W,
    bot_label: String,
    avatar: Option<String>,
    typing_shown: bool,
    input_enabled: bool,
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self::with_label(out, "guru")
    }

    pub fn with_label(out: W, bot_label: impl Into<String>) -> Self {
        Self {
            out,
            bot_label: bot_label.into(),
            avatar: None,
            typing_shown: false,
            input_enabled: true,
        }
    }

    /// Mark bot lines with the avatar's file name.
    #[must_use]
    pub fn with_avatar(mut self, avatar_path: Option<String>) -> Self {
        self.avatar = avatar_path.map(|path| {
            Path::new(&path)
                .file_name()
                .map_or_else(|| path.clone(), |name| name.to_string_lossy().into_owned())
        });
        self
    }

    /// Borrow the writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consume the surface and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            warn!(name: "surface.terminal.write_failed", error = %e, "Terminal write failed");
        }
    }

    fn bot_line(&self, content: &str) -> String {
        match &self.avatar {
            Some(avatar) => format!("{ERASE_LINE}[{avatar}] {}: {content}\n", self.bot_label),
            None => format!("{ERASE_LINE}{}: {content}\n", self.bot_label),
        }
    }
}

impl<W: Write + Send> RenderSurface for TerminalSurface<W> {
    fn append_message(&mut self, message: &Message) {
        if message.role == MessageRole::Bot {
            let line = self.bot_line(&message.content);
            self.emit(&line);
        }
    }

    fn show_typing(&mut self) {
        if self.typing_shown {
            return;
        }
        self.typing_shown = true;
        let line = format!("{} is typing...", self.bot_label);
        self.emit(&line);
    }

    fn hide_typing(&mut self) {
        if self.typing_shown {
            self.typing_shown = false;
            self.emit(ERASE_LINE);
        }
    }

    fn replace_log(&mut self, message: &Message) {
        self.typing_shown = false;
        self.emit(CLEAR_SCREEN);
        self.append_message(message);
    }

    fn clear_input(&mut self) {}

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn focus_input(&mut self) {
        if self.input_enabled {
            self.emit(PROMPT);
        }
    }
}
