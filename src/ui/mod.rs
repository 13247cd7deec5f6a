//! UI adapter module for Editor Session
//!
//! Rendering is done elsewhere. These types are the narrow interfaces the
//! session exposes to it:
//! - Tab strip rows
//! - Sidebar tree rows, activity views and search box
//! - Chat input key handling
//! - Status bar snapshot
//! - Editing widget surface

mod chat_input;
mod editor;
mod sidebar;
mod status_bar;
mod tab_bar;

pub use chat_input::{ChatInput, Key, Modifiers};
pub use editor::{sync_editor, BufferSurface, CursorPosition, EditorSurface};
pub use sidebar::{tree_rows, SidebarView, TreeRow};
pub use status_bar::{build_status, StatusSnapshot};
pub use tab_bar::{tab_rows, TabRow};
