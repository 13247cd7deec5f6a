//! Status bar snapshot
//!
//! Displays document information for the active tab and whether the
//! assistant is busy.

use crate::state::{ConversationStore, DocumentTabStore};
use crate::ui::CursorPosition;

/// Information to display in the status bar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Active document name, if any
    pub active_name: Option<String>,
    /// Language/file type
    pub language: Option<String>,
    /// Whether document is modified
    pub is_modified: bool,
    /// Total line count
    pub line_count: usize,
    /// Total character count
    pub char_count: usize,
    /// Caret location in the active document
    pub cursor: CursorPosition,
    /// Indentation width
    pub tab_size: usize,
    /// Number of open tabs
    pub tab_count: usize,
    /// Whether a reply is pending
    pub assistant_typing: bool,
}

impl StatusSnapshot {
    /// Left-hand text: document and size
    pub fn left_text(&self) -> String {
        match &self.active_name {
            Some(name) => {
                let modified = if self.is_modified { " (modified)" } else { "" };
                format!(
                    "{}{} | {} lines, {} chars",
                    name, modified, self.line_count, self.char_count
                )
            }
            None => "No file open".to_string(),
        }
    }

    /// Right-hand text: caret, indentation, language, tab count, assistant state
    pub fn right_text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(language) = &self.language {
            parts.push(self.cursor.to_string());
            parts.push(format!("Spaces: {}", self.tab_size));
            parts.push(language.clone());
        }
        parts.push("UTF-8".to_string());
        parts.push(format!("{} tabs", self.tab_count));
        if self.assistant_typing {
            parts.push("Assistant typing...".to_string());
        }
        parts.join(" | ")
    }
}

/// Collect status information from the stores and the widget's caret
pub fn build_status(
    tabs: &DocumentTabStore,
    chat: &ConversationStore,
    cursor: CursorPosition,
    tab_size: usize,
) -> StatusSnapshot {
    let mut status = StatusSnapshot {
        cursor,
        tab_size,
        tab_count: tabs.len(),
        assistant_typing: chat.is_typing(),
        ..Default::default()
    };

    if let Some(doc) = tabs.active_document() {
        status.active_name = Some(doc.name.clone());
        status.language = Some(doc.language.clone());
        status.is_modified = doc.is_modified;
        status.line_count = doc.line_count();
        status.char_count = doc.char_count();
    }

    status
}
