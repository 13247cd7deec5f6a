//! Chat input box
//!
//! Free-text buffer for the assistant panel. Enter without a modifier
//! submits; Enter with Shift, Ctrl or Alt inserts a newline.

/// Keys the input box reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Char(char),
}

/// Modifier keys held during a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };

    fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

/// Chat input state
#[derive(Debug, Clone, Default)]
pub struct ChatInput {
    buffer: String,
}

impl ChatInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Replace the text, as when the widget reports a paste
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Whether the send button should be enabled
    pub fn can_submit(&self) -> bool {
        !self.buffer.trim().is_empty()
    }

    /// Handle a key press. Returns the text to send when the press submits
    /// a non-blank message; the buffer is cleared in that case only.
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> Option<String> {
        match key {
            Key::Enter if modifiers.any() => {
                self.buffer.push('\n');
                None
            }
            Key::Enter => self.submit(),
            Key::Backspace => {
                self.buffer.pop();
                None
            }
            Key::Char(c) => {
                self.buffer.push(c);
                None
            }
        }
    }

    /// Submit via the send button
    pub fn submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        let text = std::mem::take(&mut self.buffer);
        Some(text.trim().to_string())
    }
}
