//! Open documents and the active tab
//!
//! The tab strip and the editor both read from this store: the ordered list
//! of open documents, and which one of them the editor shows.

use serde::{Deserialize, Serialize};

/// Unique identifier for documents
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a fresh identifier for an untitled document
    pub fn generate() -> Self {
        Self(format!("untitled-{}", uuid::Uuid::new_v4().simple()))
    }

    /// Get the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A single open document
#[derive(Debug, Clone)]
pub struct Document {
    /// Unique identifier for this document
    pub id: DocumentId,

    /// Display name, not necessarily unique
    pub name: String,

    /// Language tag for the editing widget's highlighter
    pub language: String,

    /// Document content as a rope
    content: ropey::Rope,

    /// Whether the content changed since the document was opened
    pub is_modified: bool,
}

impl Document {
    /// Create an unmodified document
    pub fn new(
        id: DocumentId,
        name: impl Into<String>,
        language: impl Into<String>,
        content: &str,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            language: language.into(),
            content: ropey::Rope::from_str(content),
            is_modified: false,
        }
    }

    /// Mark the document as modified on construction, for seed data
    pub fn modified(mut self) -> Self {
        self.is_modified = true;
        self
    }

    /// Get content as string
    pub fn content(&self) -> String {
        self.content.to_string()
    }

    /// Get line count
    pub fn line_count(&self) -> usize {
        self.content.len_lines()
    }

    /// Get character count
    pub fn char_count(&self) -> usize {
        self.content.len_chars()
    }

    fn replace_content(&mut self, text: &str) {
        self.content = ropey::Rope::from_str(text);
        self.is_modified = true;
    }
}

/// Ordered open documents plus the active selection
#[derive(Debug, Clone)]
pub struct DocumentTabStore {
    documents: Vec<Document>,
    active: Option<DocumentId>,
    untitled_prefix: String,
    default_language: String,
    untitled_counter: usize,
}

impl Default for DocumentTabStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTabStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            active: None,
            untitled_prefix: "Untitled".to_string(),
            default_language: "typescript".to_string(),
            untitled_counter: 0,
        }
    }

    /// Create a store seeded with documents; the first one becomes active.
    /// Later duplicates of an identifier are dropped.
    pub fn with_documents(seed: Vec<Document>) -> Self {
        let mut store = Self::new();
        for doc in seed {
            if store.contains(&doc.id) {
                log::warn!("Dropping duplicate seed document {}", doc.id);
                continue;
            }
            store.documents.push(doc);
        }
        store.active = store.documents.first().map(|d| d.id.clone());
        store
    }

    /// Set the name prefix and language used by `open_new`
    pub fn with_new_document_defaults(
        mut self,
        untitled_prefix: impl Into<String>,
        default_language: impl Into<String>,
    ) -> Self {
        self.untitled_prefix = untitled_prefix.into();
        self.default_language = default_language.into();
        self
    }

    /// Append an empty untitled document and make it active
    pub fn open_new(&mut self) -> DocumentId {
        let mut id = DocumentId::generate();
        while self.contains(&id) {
            id = DocumentId::generate();
        }

        self.untitled_counter += 1;
        let name = format!("{}-{}", self.untitled_prefix, self.untitled_counter);
        let doc = Document::new(id.clone(), name, self.default_language.clone(), "");

        log::debug!("Opened {} as {}", doc.name, id);
        self.documents.push(doc);
        self.active = Some(id.clone());
        id
    }

    /// Close a document. Closing the active one selects the first remaining
    /// document, or nothing when none remain.
    pub fn close(&mut self, id: &DocumentId) {
        let Some(index) = self.find_index(id) else {
            return;
        };
        self.documents.remove(index);

        if self.active.as_ref() == Some(id) {
            self.active = self.documents.first().map(|d| d.id.clone());
        }
        log::debug!("Closed {}, active is now {:?}", id, self.active);
    }

    /// Select a document; unknown identifiers are ignored
    pub fn select(&mut self, id: &DocumentId) {
        if self.contains(id) {
            self.active = Some(id.clone());
        }
    }

    /// Replace a document's content. Always marks it modified, even when
    /// the text is unchanged.
    pub fn update_content(&mut self, id: &DocumentId, text: &str) {
        if let Some(doc) = self.documents.iter_mut().find(|d| &d.id == id) {
            doc.replace_content(text);
        }
    }

    /// Get the currently active document
    pub fn active_document(&self) -> Option<&Document> {
        self.active.as_ref().and_then(|id| self.get(id))
    }

    /// Identifier of the active document
    pub fn active_id(&self) -> Option<&DocumentId> {
        self.active.as_ref()
    }

    /// Get a document by ID
    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| &d.id == id)
    }

    /// Documents in tab order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Check whether a document is open
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.find_index(id).is_some()
    }

    /// Get document count
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if there are any open documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn find_index(&self, id: &DocumentId) -> Option<usize> {
        self.documents.iter().position(|d| &d.id == id)
    }
}
