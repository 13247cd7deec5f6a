//! Session controller
//!
//! The only place that talks to more than one store. Every UI event and
//! timer delivery enters through `Session::update`, which routes it to the
//! store that owns the affected state and reports what needs redrawing.

use crate::assistant::{CannedResponder, ReplyDelay, Responder};
use crate::config::SessionConfig;
use crate::message::{
    ChatMessageEvent, EditorMessage, InternalMessage, Message, SidebarMessage, TabMessage,
    TreeMessage,
};
use crate::scheduler::{Scheduler, TimerId};
use crate::state::{
    default_tree, ConversationStore, Document, DocumentId, DocumentTabStore, FileTreeState,
};
use crate::ui::{self, CursorPosition, SidebarView, StatusSnapshot, TabRow, TreeRow};

/// What an update changed, so front ends redraw only that
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// Nothing visible changed
    Nothing,
    /// The active document switched; reload the editor and the tab strip
    Editor,
    /// Tab strip only (titles or modified markers)
    Tabs,
    /// File tree
    Tree,
    /// Assistant panel
    Chat,
    /// Sidebar activity view or its search box
    Sidebar,
    /// Status bar only
    Status,
}

/// One editor session: tabs, file tree and assistant panel
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    tabs: DocumentTabStore,
    tree: FileTreeState,
    chat: ConversationStore,
    sidebar_view: SidebarView,
    search_query: String,
    cursor: CursorPosition,
}

impl Session {
    /// Create a session with no open documents, the sample tree and the
    /// canned assistant
    pub fn new(config: SessionConfig, scheduler: Box<dyn Scheduler>) -> Self {
        let responder = Box::new(CannedResponder::from_config(&config.assistant));
        Self::with_responder(config, scheduler, responder)
    }

    /// Create a session with a custom reply policy
    pub fn with_responder(
        config: SessionConfig,
        scheduler: Box<dyn Scheduler>,
        responder: Box<dyn Responder>,
    ) -> Self {
        let delay = ReplyDelay::from_config(&config.assistant);
        let mut chat = ConversationStore::new(scheduler, responder, delay);
        if let Some(greeting) = &config.assistant.greeting {
            chat = chat.with_greeting(greeting.clone());
        }

        let tabs = DocumentTabStore::new().with_new_document_defaults(
            config.editor.untitled_prefix.clone(),
            config.editor.default_language.clone(),
        );

        log::info!("Session started");
        Self {
            config,
            tabs,
            tree: FileTreeState::with_open(default_tree(), ["src"]),
            chat,
            sidebar_view: SidebarView::default(),
            search_query: String::new(),
            cursor: CursorPosition::default(),
        }
    }

    /// Session seeded with the sample project's open files
    pub fn demo(config: SessionConfig, scheduler: Box<dyn Scheduler>) -> Self {
        Self::new(config, scheduler).with_documents(demo_documents())
    }

    /// Replace the open documents; the first becomes active
    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.tabs = DocumentTabStore::with_documents(documents).with_new_document_defaults(
            self.config.editor.untitled_prefix.clone(),
            self.config.editor.default_language.clone(),
        );
        self
    }

    /// Replace the file tree
    pub fn with_tree(mut self, tree: FileTreeState) -> Self {
        self.tree = tree;
        self
    }

    /// Handle one message
    pub fn update(&mut self, message: Message) -> Redraw {
        match message {
            Message::Tab(msg) => self.handle_tab_message(msg),
            Message::Editor(msg) => self.handle_editor_message(msg),
            Message::Tree(msg) => self.handle_tree_message(msg),
            Message::Chat(msg) => self.handle_chat_message(msg),
            Message::Sidebar(msg) => self.handle_sidebar_message(msg),
            Message::Internal(msg) => self.handle_internal_message(msg),
        }
    }

    /// Deliver a batch of due timers, e.g. from `VirtualScheduler::advance`
    pub fn deliver_due(&mut self, timers: impl IntoIterator<Item = TimerId>) -> usize {
        timers
            .into_iter()
            .filter(|&timer| {
                self.update(Message::Internal(InternalMessage::ReplyDue(timer))) == Redraw::Chat
            })
            .count()
    }

    fn handle_tab_message(&mut self, msg: TabMessage) -> Redraw {
        let before = self.tabs.active_id().cloned();
        match msg {
            TabMessage::Select(id) => self.tabs.select(&id),
            TabMessage::Close(id) => {
                if !self.tabs.contains(&id) {
                    return Redraw::Nothing;
                }
                self.tabs.close(&id);
                if self.tabs.active_id() == before.as_ref() {
                    return Redraw::Tabs;
                }
            }
            TabMessage::New => {
                self.tabs.open_new();
            }
        }

        if self.tabs.active_id() == before.as_ref() {
            Redraw::Nothing
        } else {
            self.cursor = CursorPosition::default();
            Redraw::Editor
        }
    }

    fn handle_editor_message(&mut self, msg: EditorMessage) -> Redraw {
        match msg {
            EditorMessage::Changed(text) => {
                let Some(id) = self.tabs.active_id().cloned() else {
                    log::debug!("Editor change with no active document ignored");
                    return Redraw::Nothing;
                };
                self.tabs.update_content(&id, &text);
                Redraw::Tabs
            }
            EditorMessage::CursorMoved { line, column } => {
                if self.tabs.active_id().is_none() {
                    return Redraw::Nothing;
                }
                let cursor = CursorPosition::new(line, column);
                if cursor == self.cursor {
                    return Redraw::Nothing;
                }
                self.cursor = cursor;
                Redraw::Status
            }
        }
    }

    fn handle_tree_message(&mut self, msg: TreeMessage) -> Redraw {
        match msg {
            TreeMessage::Toggle { id, open } => {
                if self.tree.is_open(&id) == open {
                    return Redraw::Nothing;
                }
                self.tree.toggle(&id, open);
                if self.tree.is_open(&id) == open {
                    Redraw::Tree
                } else {
                    Redraw::Nothing
                }
            }
        }
    }

    fn handle_chat_message(&mut self, msg: ChatMessageEvent) -> Redraw {
        match msg {
            ChatMessageEvent::Send(text) => {
                let before = self.chat.messages().len();
                self.chat.send(&text);
                if self.chat.messages().len() == before {
                    Redraw::Nothing
                } else {
                    Redraw::Chat
                }
            }
            ChatMessageEvent::Clear => {
                self.chat.clear();
                Redraw::Chat
            }
        }
    }

    fn handle_sidebar_message(&mut self, msg: SidebarMessage) -> Redraw {
        match msg {
            SidebarMessage::SelectView(view) => {
                if self.sidebar_view == view {
                    return Redraw::Nothing;
                }
                self.sidebar_view = view;
                Redraw::Sidebar
            }
            SidebarMessage::SearchChanged(query) => {
                if self.search_query == query {
                    return Redraw::Nothing;
                }
                self.search_query = query;
                Redraw::Sidebar
            }
        }
    }

    fn handle_internal_message(&mut self, msg: InternalMessage) -> Redraw {
        match msg {
            InternalMessage::ReplyDue(timer) => match self.chat.deliver(timer) {
                Some(_) => Redraw::Chat,
                None => Redraw::Nothing,
            },
        }
    }

    /// Document store
    pub fn tabs(&self) -> &DocumentTabStore {
        &self.tabs
    }

    /// File tree state
    pub fn tree(&self) -> &FileTreeState {
        &self.tree
    }

    /// Conversation store
    pub fn chat(&self) -> &ConversationStore {
        &self.chat
    }

    /// Selected sidebar panel
    pub fn sidebar_view(&self) -> SidebarView {
        self.sidebar_view
    }

    /// Text in the search panel's input
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Last caret location reported by the widget
    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Rows for the tab strip
    pub fn tab_rows(&self) -> Vec<TabRow> {
        ui::tab_rows(&self.tabs)
    }

    /// Rows for the file tree
    pub fn tree_rows(&self) -> Vec<TreeRow> {
        ui::tree_rows(&self.tree)
    }

    /// Status bar contents
    pub fn status(&self) -> StatusSnapshot {
        ui::build_status(&self.tabs, &self.chat, self.cursor, self.config.editor.tab_size)
    }
}

/// The two files open when the sample project starts
pub fn demo_documents() -> Vec<Document> {
    vec![
        Document::new(
            DocumentId::new("app-tsx"),
            "App.tsx",
            "typescript",
            DEMO_APP_TSX,
        ),
        Document::new(
            DocumentId::new("readme-md"),
            "README.md",
            "markdown",
            DEMO_README,
        )
        .modified(),
    ]
}

const DEMO_APP_TSX: &str = r#"import React from 'react';
import './App.css';

import Sidebar from './components/Sidebar';
import EditorArea from './components/EditorArea';
import StatusBar from './components/StatusBar';
import ChatPanel from './components/ChatPanel';

function App() {
  return (
    <div className="app-container">
      <div className="main-content">
        <Sidebar />
        <EditorArea />
        <ChatPanel />
      </div>
      <StatusBar />
    </div>
  );
}

export default App;"#;

const DEMO_README: &str = r#"# Editor Shell

A code-editor shell with a file explorer, tabbed editor and assistant chat panel.

## Features

- Tabbed editing
- File explorer
- Assistant chat panel
- Status bar
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::EchoResponder;
    use crate::config::AssistantConfig;
    use crate::scheduler::VirtualScheduler;
    use crate::state::Role;
    use std::time::Duration;

    fn quiet_config() -> SessionConfig {
        SessionConfig {
            assistant: AssistantConfig {
                min_delay_ms: 1000,
                max_delay_ms: 3000,
                greeting: None,
                seed: Some(11),
                ..AssistantConfig::default()
            },
            ..SessionConfig::default()
        }
    }

    fn echo_session() -> (Session, VirtualScheduler) {
        let clock = VirtualScheduler::default();
        let session = Session::with_responder(
            quiet_config(),
            Box::new(clock.clone()),
            Box::new(EchoResponder),
        )
        .with_documents(demo_documents());
        (session, clock)
    }

    #[test]
    fn test_demo_session() {
        let session = Session::demo(SessionConfig::default(), Box::new(VirtualScheduler::default()));

        assert_eq!(session.tabs().len(), 2);
        assert_eq!(
            session.tabs().active_id(),
            Some(&DocumentId::new("app-tsx"))
        );
        assert!(session.tree().is_open("src"));
        assert_eq!(session.chat().messages().len(), 1);
        assert_eq!(session.chat().messages()[0].role, Role::Assistant);
        assert_eq!(session.sidebar_view(), SidebarView::Explorer);
    }

    #[test]
    fn test_close_active_tab_scenario() {
        let (mut session, _clock) = echo_session();

        let redraw = session.update(TabMessage::Close(DocumentId::new("app-tsx")).into());

        assert_eq!(redraw, Redraw::Editor);
        let ids: Vec<_> = session.tab_rows().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![DocumentId::new("readme-md")]);
        assert_eq!(
            session.tabs().active_document().unwrap().id,
            DocumentId::new("readme-md")
        );
    }

    #[test]
    fn test_close_inactive_and_unknown_tab() {
        let (mut session, _clock) = echo_session();

        assert_eq!(
            session.update(TabMessage::Close(DocumentId::new("nope")).into()),
            Redraw::Nothing
        );
        assert_eq!(
            session.update(TabMessage::Close(DocumentId::new("readme-md")).into()),
            Redraw::Tabs
        );
        assert_eq!(
            session.tabs().active_id(),
            Some(&DocumentId::new("app-tsx"))
        );
    }

    #[test]
    fn test_new_tab_and_edit() {
        let (mut session, _clock) = echo_session();

        assert_eq!(session.update(TabMessage::New.into()), Redraw::Editor);
        let active = session.tabs().active_document().unwrap();
        assert_eq!(active.name, "Untitled-1");
        assert_eq!(active.language, "typescript");

        assert_eq!(
            session.update(EditorMessage::Changed("let x = 1;".to_string()).into()),
            Redraw::Tabs
        );
        let status = session.status();
        assert!(status.is_modified);
        assert_eq!(status.char_count, 10);
        assert_eq!(status.tab_count, 3);
    }

    #[test]
    fn test_edit_without_active_document() {
        let mut session = Session::with_responder(
            quiet_config(),
            Box::new(VirtualScheduler::default()),
            Box::new(EchoResponder),
        );

        assert_eq!(
            session.update(EditorMessage::Changed("text".to_string()).into()),
            Redraw::Nothing
        );
        assert!(session.tabs().is_empty());
        assert_eq!(session.status().left_text(), "No file open");
    }

    #[test]
    fn test_tree_toggle_does_not_touch_tabs() {
        let (mut session, _clock) = echo_session();
        let tabs_before = session.tab_rows();

        let open = TreeMessage::Toggle {
            id: "components".to_string(),
            open: true,
        };
        assert_eq!(session.update(open.clone().into()), Redraw::Tree);
        assert_eq!(session.update(open.into()), Redraw::Nothing);
        assert_eq!(
            session.update(
                TreeMessage::Toggle {
                    id: "App.tsx".to_string(),
                    open: true
                }
                .into()
            ),
            Redraw::Nothing
        );

        assert!(session.tree().is_open("components"));
        assert_eq!(session.tab_rows(), tabs_before);
    }

    #[test]
    fn test_sidebar_view_selection() {
        let (mut session, _clock) = echo_session();
        let search = Message::Sidebar(SidebarMessage::SelectView(SidebarView::Search));

        assert_eq!(session.update(search.clone()), Redraw::Sidebar);
        assert_eq!(session.update(search), Redraw::Nothing);
        assert_eq!(session.sidebar_view(), SidebarView::Search);
    }

    #[test]
    fn test_search_query_tracked() {
        let (mut session, _clock) = echo_session();
        let typed = SidebarMessage::SearchChanged("useState".to_string());

        assert_eq!(session.update(typed.clone().into()), Redraw::Sidebar);
        assert_eq!(session.update(typed.into()), Redraw::Nothing);
        assert_eq!(session.search_query(), "useState");

        // Switching panels keeps the query
        session.update(SidebarMessage::SelectView(SidebarView::Explorer).into());
        assert_eq!(session.search_query(), "useState");
    }

    #[test]
    fn test_cursor_in_status_and_reset_on_switch() {
        let (mut session, _clock) = echo_session();
        assert_eq!(
            session.status().right_text(),
            "Ln 1, Col 1 | Spaces: 2 | typescript | UTF-8 | 2 tabs"
        );

        let moved = EditorMessage::CursorMoved { line: 4, column: 9 };
        assert_eq!(session.update(moved.clone().into()), Redraw::Status);
        assert_eq!(session.update(moved.into()), Redraw::Nothing);
        assert!(session.status().right_text().starts_with("Ln 4, Col 9 | "));

        session.update(TabMessage::Select(DocumentId::new("readme-md")).into());
        assert_eq!(session.cursor(), CursorPosition::default());
    }

    #[test]
    fn test_cursor_ignored_without_document() {
        let mut session = Session::with_responder(
            quiet_config(),
            Box::new(VirtualScheduler::default()),
            Box::new(EchoResponder),
        );

        let moved = EditorMessage::CursorMoved { line: 2, column: 2 };
        assert_eq!(session.update(moved.into()), Redraw::Nothing);
        assert_eq!(session.status().right_text(), "UTF-8 | 0 tabs");
    }

    #[test]
    fn test_blank_send_changes_nothing() {
        let (mut session, clock) = echo_session();

        assert_eq!(
            session.update(ChatMessageEvent::Send("   ".to_string()).into()),
            Redraw::Nothing
        );
        assert!(session.chat().messages().is_empty());
        assert!(!session.chat().is_typing());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_send_then_reply() {
        let (mut session, clock) = echo_session();

        session.update(ChatMessageEvent::Send("hi".to_string()).into());
        assert_eq!(session.chat().messages().len(), 1);
        assert!(session.status().assistant_typing);

        let delivered = session.deliver_due(clock.advance(Duration::from_secs(3)));

        assert_eq!(delivered, 1);
        let log = session.chat().messages();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].role, Role::Assistant);
        assert_eq!(log[1].content, "hi");
        assert!(!session.chat().is_typing());
    }

    #[test]
    fn test_clear_while_pending_is_final() {
        let (mut session, clock) = echo_session();

        session.update(ChatMessageEvent::Send("hi".to_string()).into());
        session.update(ChatMessageEvent::Clear.into());

        assert!(session.chat().messages().is_empty());
        assert!(!session.chat().is_typing());

        let delivered = session.deliver_due(clock.advance(Duration::from_secs(10)));
        assert_eq!(delivered, 0);
        assert!(session.chat().messages().is_empty());
    }

    #[test]
    fn test_two_sends_before_any_reply() {
        let (mut session, clock) = echo_session();

        session.update(ChatMessageEvent::Send("a".to_string()).into());
        session.update(ChatMessageEvent::Send("b".to_string()).into());

        let contents: Vec<_> = session
            .chat()
            .messages()
            .iter()
            .map(|m| (m.role, m.content.clone()))
            .collect();
        assert_eq!(
            contents,
            vec![(Role::User, "a".to_string()), (Role::User, "b".to_string())]
        );
        assert!(session.chat().is_typing());

        session.deliver_due(clock.advance(Duration::from_secs(3)));

        let log = session.chat().messages();
        assert_eq!(log.len(), 4);
        assert_eq!(log.iter().filter(|m| m.role == Role::User).count(), 2);
        assert_eq!(log.iter().filter(|m| m.role == Role::Assistant).count(), 2);
        assert!(!session.chat().is_typing());
    }

    #[test]
    fn test_stale_reply_due_is_ignored() {
        let (mut session, _clock) = echo_session();
        session.update(ChatMessageEvent::Send("hi".to_string()).into());
        let timer = session.chat().pending().next().unwrap().handle.id;
        session.update(ChatMessageEvent::Clear.into());

        let redraw = session.update(Message::Internal(InternalMessage::ReplyDue(timer)));
        assert_eq!(redraw, Redraw::Nothing);
        assert!(session.chat().messages().is_empty());
    }
}
