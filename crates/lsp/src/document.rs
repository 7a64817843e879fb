// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Document Management
//!
//! Open documents, keyed by URI, with their text held in a rope.
//!
//! Columns are counted in chars, the same unit the span scanner reports.
//!
//! ## Example
//!
//! ```rust,ignore
//! use jsonsql_lsp::DocumentStore;
//! use tower_lsp::lsp_types::Url;
//!
//! let store = DocumentStore::new();
//! let uri = Url::parse("file:///work/queries.json").unwrap();
//!
//! store.open_document(uri.clone(), content, 1, "json".to_string()).await?;
//! store.set_language_id(&uri, "sql-in-json").await?;
//! ```

use jsonsql_core::LINE_BREAKS;
use ropey::Rope;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp::lsp_types::{
    Range, TextDocumentContentChangeEvent, Url, VersionedTextDocumentIdentifier,
};

/// Document metadata
#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    /// Document URI
    pub uri: Url,

    /// Language identifier (`json`, `sql-in-json`, ...)
    pub language_id: String,

    /// Document version, as sent by the client
    pub version: i32,

    /// Line count
    pub line_count: usize,
}

impl DocumentMetadata {
    /// Create new document metadata
    pub fn new(uri: Url, language_id: String, version: i32, line_count: usize) -> Self {
        Self {
            uri,
            language_id,
            version,
            line_count,
        }
    }
}

/// A document managed by the LSP server
#[derive(Debug, Clone)]
pub struct Document {
    metadata: DocumentMetadata,
    content: Rope,
}

impl Document {
    /// Create a new document
    pub fn new(uri: Url, content: String, version: i32, language_id: String) -> Self {
        let rope = Rope::from_str(&content);
        let line_count = rope.len_lines();

        Self {
            metadata: DocumentMetadata::new(uri, language_id, version, line_count),
            content: rope,
        }
    }

    pub fn uri(&self) -> &Url {
        &self.metadata.uri
    }

    pub fn language_id(&self) -> &str {
        &self.metadata.language_id
    }

    /// Relabel the document after a mode switch
    pub fn set_language_id(&mut self, language_id: impl Into<String>) {
        self.metadata.language_id = language_id.into();
    }

    pub fn version(&self) -> i32 {
        self.metadata.version
    }

    pub fn line_count(&self) -> usize {
        self.metadata.line_count
    }

    /// Path used for file filtering
    ///
    /// The URI path for every scheme, so unsaved and remote documents are
    /// filtered by name too.
    pub fn path(&self) -> &str {
        self.metadata.uri.path()
    }

    /// Get the full document content as a string
    pub fn get_content(&self) -> String {
        self.content.to_string()
    }

    /// Get a line of text, without its line ending
    pub fn get_line(&self, line: usize) -> Option<String> {
        if line >= self.line_count() {
            return None;
        }

        let line_with_ending = self.content.line(line).to_string();
        Some(line_with_ending.trim_end_matches(LINE_BREAKS).to_string())
    }

    /// Get text between two (line, char column) positions
    pub fn get_text(
        &self,
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Option<String> {
        let start_char = self.offset(start_line, start_col)?;
        let end_char = self.offset(end_line, end_col)?;

        if start_char > end_char {
            return None;
        }

        Some(self.content.slice(start_char..end_char).to_string())
    }

    /// Get the text covered by an LSP range
    pub fn text_in_range(&self, range: &Range) -> Option<String> {
        self.get_text(
            range.start.line as usize,
            range.start.character as usize,
            range.end.line as usize,
            range.end.character as usize,
        )
    }

    /// Get the char offset for a line and column
    pub fn offset(&self, line: usize, col: usize) -> Option<usize> {
        if line >= self.line_count() {
            return None;
        }

        let line_start = self.content.line_to_char(line);
        let line_end = if line + 1 < self.line_count() {
            self.content.line_to_char(line + 1)
        } else {
            self.content.len_chars()
        };

        let offset = line_start + col;
        if offset > line_end {
            return None;
        }

        Some(offset)
    }

    /// Apply content changes to the document
    pub fn apply_changes(
        &mut self,
        changes: &[TextDocumentContentChangeEvent],
        new_version: i32,
    ) -> Result<(), DocumentError> {
        for change in changes {
            match (&change.range, &change.range_length) {
                (Some(range), _) => {
                    let start = (range.start.line as usize, range.start.character as usize);
                    let end = (range.end.line as usize, range.end.character as usize);

                    let (Some(start_char), Some(end_char)) =
                        (self.offset(start.0, start.1), self.offset(end.0, end.1))
                    else {
                        return Err(DocumentError::InvalidRange { start, end });
                    };

                    if start_char > end_char {
                        return Err(DocumentError::InvalidRange { start, end });
                    }

                    self.content.remove(start_char..end_char);
                    self.content.insert(start_char, &change.text);
                }
                (None, None) => {
                    self.content = Rope::from_str(&change.text);
                }
                (None, Some(_)) => {
                    return Err(DocumentError::InvalidChange);
                }
            }
            self.metadata.line_count = self.content.len_lines();
        }

        self.metadata.version = new_version;

        Ok(())
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }
}

/// Thread-safe store for all open documents
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Arc<RwLock<HashMap<Url, Document>>>,
}

impl DocumentStore {
    /// Create a new document store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document, replacing any earlier copy
    pub async fn open_document(
        &self,
        uri: Url,
        content: String,
        version: i32,
        language_id: String,
    ) -> Result<(), DocumentError> {
        let mut docs = self.documents.write().await;

        let document = Document::new(uri.clone(), content, version, language_id);
        docs.insert(uri, document);

        Ok(())
    }

    /// Close a document
    ///
    /// Returns false if it was not open.
    pub async fn close_document(&self, uri: &Url) -> bool {
        let mut docs = self.documents.write().await;
        docs.remove(uri).is_some()
    }

    /// Apply client edits to an open document
    pub async fn update_document(
        &self,
        identifier: &VersionedTextDocumentIdentifier,
        changes: &[TextDocumentContentChangeEvent],
    ) -> Result<(), DocumentError> {
        let mut docs = self.documents.write().await;

        let document = docs
            .get_mut(&identifier.uri)
            .ok_or_else(|| DocumentError::DocumentNotFound(identifier.uri.clone()))?;

        document.apply_changes(changes, identifier.version)
    }

    /// Record the language id the client was asked to switch to
    pub async fn set_language_id(&self, uri: &Url, language_id: &str) -> Result<(), DocumentError> {
        let mut docs = self.documents.write().await;
        let doc = docs
            .get_mut(uri)
            .ok_or_else(|| DocumentError::DocumentNotFound(uri.clone()))?;
        doc.set_language_id(language_id);
        Ok(())
    }

    /// Snapshot of a document
    pub async fn get_document(&self, uri: &Url) -> Option<Document> {
        let docs = self.documents.read().await;
        docs.get(uri).cloned()
    }

    pub async fn has_document(&self, uri: &Url) -> bool {
        let docs = self.documents.read().await;
        docs.contains_key(uri)
    }

    pub async fn list_uris(&self) -> Vec<Url> {
        let docs = self.documents.read().await;
        docs.keys().cloned().collect()
    }

    pub async fn document_count(&self) -> usize {
        let docs = self.documents.read().await;
        docs.len()
    }
}

/// Document-related errors
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Document not found
    #[error("Document not found: {0}")]
    DocumentNotFound(Url),

    /// Invalid range for text operation
    #[error("Invalid range: start={start:?}, end={end:?}")]
    InvalidRange {
        start: (usize, usize),
        end: (usize, usize),
    },

    /// Range length without a range
    #[error("Invalid content change")]
    InvalidChange,
}
