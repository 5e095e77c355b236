//! Document version tracking
//!
//! Records the newest version and full text seen for every open document so
//! a finished analysis pass can tell whether its result is still wanted, and
//! a pass deferred while settings load can pick up the latest content.

use dashmap::DashMap;
use devskim_protocol::DocumentIdentity;

/// Open documents and their newest versions
#[derive(Debug, Default)]
pub struct DocumentManager {
    documents: DashMap<DocumentIdentity, DocumentState>,
}

/// State of an open document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    /// Newest version seen
    pub version: i32,
    /// Full text of that version, if the client sent it
    pub text: Option<String>,
}

impl DocumentManager {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Open a document
    pub fn open(&self, document: DocumentIdentity, version: i32, text: Option<String>) {
        self.documents
            .insert(document, DocumentState { version, text });
    }

    /// Record a new version
    ///
    /// Returns false when `version` is older than one already seen. Changes
    /// for documents that were never opened start tracking them.
    pub fn update(&self, document: &DocumentIdentity, version: i32, text: Option<String>) -> bool {
        let mut state = self
            .documents
            .entry(document.clone())
            .or_insert(DocumentState {
                version,
                text: None,
            });

        if version < state.version {
            return false;
        }
        state.version = version;
        state.text = text;
        true
    }

    /// Close a document
    pub fn close(&self, document: &DocumentIdentity) {
        self.documents.remove(document);
    }

    /// Is `version` still the newest version of an open document?
    pub fn is_current(&self, document: &DocumentIdentity, version: i32) -> bool {
        self.documents
            .get(document)
            .is_some_and(|state| state.version == version)
    }

    /// Newest version and text of an open document
    pub fn latest(&self, document: &DocumentIdentity) -> Option<DocumentState> {
        self.documents.get(document).map(|state| state.clone())
    }

    pub fn is_open(&self, document: &DocumentIdentity) -> bool {
        self.documents.contains_key(document)
    }
}
