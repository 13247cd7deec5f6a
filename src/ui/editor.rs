//! Editing widget boundary
//!
//! The code editor itself is external. The session only pushes the active
//! document's language and text into it, and receives full-text change
//! events back as `EditorMessage::Changed`.

use crate::state::DocumentTabStore;

/// What the session needs from an editing widget
pub trait EditorSurface {
    /// Show `value`, highlighted as `language`
    fn set_value(&mut self, language: &str, value: &str);

    /// Current full text
    fn value(&self) -> String;

    /// Show the empty state (no document open)
    fn clear(&mut self);
}

/// Caret location reported by the widget, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

impl CursorPosition {
    /// Clamp to the first line and column
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line: line.max(1),
            column: column.max(1),
        }
    }
}

impl Default for CursorPosition {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl std::fmt::Display for CursorPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ln {}, Col {}", self.line, self.column)
    }
}

/// Load the active document into the surface, or clear it
pub fn sync_editor(surface: &mut dyn EditorSurface, tabs: &DocumentTabStore) {
    match tabs.active_document() {
        Some(doc) => surface.set_value(&doc.language, &doc.content()),
        None => surface.clear(),
    }
}

/// In-memory surface, for headless front ends and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferSurface {
    pub language: Option<String>,
    pub text: String,
}

impl EditorSurface for BufferSurface {
    fn set_value(&mut self, language: &str, value: &str) {
        self.language = Some(language.to_string());
        self.text = value.to_string();
    }

    fn value(&self) -> String {
        self.text.clone()
    }

    fn clear(&mut self) {
        self.language = None;
        self.text.clear();
    }
}
