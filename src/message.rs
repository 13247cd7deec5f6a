//! Session message types
//!
//! Every user action and every timer delivery reaches the session as a
//! `Message`. Messages are grouped by the panel that emits them.

use crate::scheduler::TimerId;
use crate::state::DocumentId;
use crate::ui::SidebarView;

/// Main session message enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Tab strip operations
    Tab(TabMessage),

    /// Editing widget events
    Editor(EditorMessage),

    /// File tree operations
    Tree(TreeMessage),

    /// Assistant panel operations
    Chat(ChatMessageEvent),

    /// Sidebar activity bar
    Sidebar(SidebarMessage),

    /// Results of deferred work
    Internal(InternalMessage),
}

/// Tab-related messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabMessage {
    /// Select a tab by document ID
    Select(DocumentId),

    /// Close a tab
    Close(DocumentId),

    /// Open a new untitled document
    New,
}

/// Editor-related messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMessage {
    /// The widget reported a new full text for the active document
    Changed(String),

    /// The caret moved; 1-based line and column
    CursorMoved { line: usize, column: usize },
}

/// File tree messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeMessage {
    /// Expand (`open = true`) or collapse a folder
    Toggle { id: String, open: bool },
}

/// Assistant panel messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatMessageEvent {
    /// Submit text to the assistant
    Send(String),

    /// Discard the conversation and any reply still on its way
    Clear,
}

/// Sidebar messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarMessage {
    /// Switch the activity panel
    SelectView(SidebarView),

    /// Text typed into the search panel's input
    SearchChanged(String),
}

/// Internal messages produced by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalMessage {
    /// A scheduled assistant reply came due
    ReplyDue(TimerId),
}

impl From<TabMessage> for Message {
    fn from(msg: TabMessage) -> Self {
        Message::Tab(msg)
    }
}

impl From<EditorMessage> for Message {
    fn from(msg: EditorMessage) -> Self {
        Message::Editor(msg)
    }
}

impl From<TreeMessage> for Message {
    fn from(msg: TreeMessage) -> Self {
        Message::Tree(msg)
    }
}

impl From<ChatMessageEvent> for Message {
    fn from(msg: ChatMessageEvent) -> Self {
        Message::Chat(msg)
    }
}

impl From<SidebarMessage> for Message {
    fn from(msg: SidebarMessage) -> Self {
        Message::Sidebar(msg)
    }
}
