//! Sidebar rows and activity views
//!
//! Produces the flat row list a tree widget renders from the static
//! hierarchy and the current expansion state.

use crate::state::{FileTreeState, NodeKind};

/// Which panel the sidebar's activity bar has selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarView {
    #[default]
    Explorer,
    Search,
    SourceControl,
    Extensions,
}

impl SidebarView {
    /// Panel title
    pub fn title(&self) -> &'static str {
        match self {
            SidebarView::Explorer => "Explorer",
            SidebarView::Search => "Search",
            SidebarView::SourceControl => "Source Control",
            SidebarView::Extensions => "Extensions",
        }
    }
}

/// A single visible row of the file tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    /// Nesting depth from the root (0-based)
    pub depth: usize,
    pub is_open: bool,
    pub has_children: bool,
}

impl TreeRow {
    /// Indented label with an expansion marker for folders
    pub fn label(&self) -> String {
        let marker = match (self.has_children, self.is_open) {
            (true, true) => "▾ ",
            (true, false) => "▸ ",
            (false, _) => "  ",
        };
        format!("{}{}{}", "  ".repeat(self.depth), marker, self.name)
    }
}

/// Build the visible rows of the tree
pub fn tree_rows(tree: &FileTreeState) -> Vec<TreeRow> {
    tree.visible_nodes()
        .into_iter()
        .map(|visible| TreeRow {
            id: visible.node.id.clone(),
            name: visible.node.name.clone(),
            kind: visible.node.kind,
            depth: visible.depth,
            is_open: tree.is_open(&visible.node.id),
            has_children: visible.node.is_expandable(),
        })
        .collect()
}
