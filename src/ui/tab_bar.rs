//! Tab strip rows
//!
//! Flattens the document store into what a tab strip renders: one row per
//! open document, in order, with the active one flagged.

use crate::state::{DocumentId, DocumentTabStore};

/// Information about a single tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabRow {
    /// Document ID
    pub id: DocumentId,
    /// Document name
    pub title: String,
    /// Whether the document has been edited since it was opened
    pub is_modified: bool,
    /// Whether this tab is shown in the editor
    pub is_active: bool,
}

impl TabRow {
    /// Get display title with modification indicator
    pub fn display_title(&self) -> String {
        if self.is_modified {
            format!("{} ●", self.title)
        } else {
            self.title.clone()
        }
    }
}

/// Build the tab strip for the current store state
pub fn tab_rows(tabs: &DocumentTabStore) -> Vec<TabRow> {
    let active = tabs.active_id();
    tabs.documents()
        .iter()
        .map(|doc| TabRow {
            id: doc.id.clone(),
            title: doc.name.clone(),
            is_modified: doc.is_modified,
            is_active: active == Some(&doc.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Document;

    #[test]
    fn test_rows_follow_store() {
        let mut store = DocumentTabStore::with_documents(vec![
            Document::new(DocumentId::new("a"), "a.ts", "typescript", ""),
            Document::new(DocumentId::new("b"), "b.md", "markdown", "").modified(),
        ]);
        store.select(&DocumentId::new("b"));

        let rows = tab_rows(&store);
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].is_active);
        assert!(rows[1].is_active);
        assert_eq!(rows[0].display_title(), "a.ts");
        assert_eq!(rows[1].display_title(), "b.md ●");
    }
}
