// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Document Synchronization
//!
//! Runs the mode rules when documents open or change, and builds the
//! per-line code lenses.
//!
//! ## Architecture
//!
//! ```text
//! DocumentSync
//!     ├─→ ServerConfig (file filter, code lens switch)
//!     ├─→ ModeWatcher (from jsonsql-core)
//!     └─→ ModeSwitch ──→ jsonSql/setLanguage notification
//!           ↓
//!        on_document_open()
//!        on_document_change()
//!        code_lenses()
//! ```

use async_trait::async_trait;
use jsonsql_core::mode::{JSON_LANGUAGE_ID, SQL_IN_JSON_LANGUAGE_ID};
use jsonsql_core::{DocumentMode, ModeWatcher, SpanScanner, SqlDetector, SqlSpan, SqlVocabulary};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp::Client;
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::{CodeLens, Command, Position, Range, Url};
use tracing::{debug, info};

use crate::commands::OPEN_SQL_EDITOR;
use crate::config::ServerConfig;
use crate::document::{Document, DocumentError, DocumentStore};

/// Title of the lens placed above each embedded query
pub const CODE_LENS_TITLE: &str = "Open in SQL Editor";

/// `jsonSql/setLanguage` notification
#[derive(Debug)]
pub enum SetLanguage {}

impl Notification for SetLanguage {
    type Params = SetLanguageParams;
    const METHOD: &'static str = "jsonSql/setLanguage";
}

/// Parameters of [`SetLanguage`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLanguageParams {
    pub uri: Url,
    pub language_id: String,
}

/// Capability to relabel a document in the editor
#[async_trait]
pub trait ModeSwitch: Send + Sync {
    async fn set_document_mode(&self, uri: Url, mode: DocumentMode);
}

#[async_trait]
impl ModeSwitch for Client {
    async fn set_document_mode(&self, uri: Url, mode: DocumentMode) {
        self.send_notification::<SetLanguage>(SetLanguageParams {
            uri,
            language_id: mode.language_id().to_string(),
        })
        .await;
    }
}

/// Document synchronization manager
#[derive(Debug, Clone)]
pub struct DocumentSync {
    config: Arc<RwLock<ServerConfig>>,
}

impl DocumentSync {
    /// Create a new document sync manager
    pub fn new(config: Arc<RwLock<ServerConfig>>) -> Self {
        Self { config }
    }

    async fn watcher(&self) -> ModeWatcher<'static> {
        let filter = self.config.read().await.file_filter();
        ModeWatcher::new(filter, SqlDetector::default())
    }

    /// Apply the open rule to a stored document
    ///
    /// Returns the mode the document was switched to, if any.
    pub async fn on_document_open(
        &self,
        store: &DocumentStore,
        switch: &dyn ModeSwitch,
        uri: &Url,
    ) -> Result<Option<DocumentMode>, DocumentError> {
        let document = store
            .get_document(uri)
            .await
            .ok_or_else(|| DocumentError::DocumentNotFound(uri.clone()))?;

        let decision = self.watcher().await.on_open(
            document.path(),
            document.language_id(),
            &document.get_content(),
        );
        self.apply_mode(store, switch, uri, decision).await
    }

    /// Apply the change rule to a stored document
    pub async fn on_document_change(
        &self,
        store: &DocumentStore,
        switch: &dyn ModeSwitch,
        uri: &Url,
    ) -> Result<Option<DocumentMode>, DocumentError> {
        let document = store
            .get_document(uri)
            .await
            .ok_or_else(|| DocumentError::DocumentNotFound(uri.clone()))?;

        let decision = self.watcher().await.on_change(
            document.path(),
            document.language_id(),
            &document.get_content(),
        );
        self.apply_mode(store, switch, uri, decision).await
    }

    async fn apply_mode(
        &self,
        store: &DocumentStore,
        switch: &dyn ModeSwitch,
        uri: &Url,
        decision: Option<DocumentMode>,
    ) -> Result<Option<DocumentMode>, DocumentError> {
        let Some(mode) = decision else {
            return Ok(None);
        };

        info!("Switching {} to {}", uri, mode.language_id());
        store.set_language_id(uri, mode.language_id()).await?;
        switch.set_document_mode(uri.clone(), mode).await;
        Ok(Some(mode))
    }

    /// One "Open in SQL Editor" lens per line holding an embedded query
    pub async fn code_lenses(&self, document: &Document) -> Vec<CodeLens> {
        if !self.config.read().await.code_lens {
            return Vec::new();
        }

        if !matches!(
            document.language_id(),
            JSON_LANGUAGE_ID | SQL_IN_JSON_LANGUAGE_ID
        ) {
            debug!("No lenses for language {}", document.language_id());
            return Vec::new();
        }

        // Rope line numbering, shared with `text_in_range`.
        let scanner = SpanScanner::new(SqlVocabulary::standard());
        (0..document.line_count())
            .filter_map(|line| {
                let text = document.get_line(line)?;
                scanner
                    .find_in_line(&text)
                    .map(|span| code_lens(document.uri(), line, &span))
            })
            .collect()
    }
}

/// Range of the span's content, quotes excluded
pub fn content_range(line: usize, span: &SqlSpan) -> Range {
    let content = span.content_range();
    Range {
        start: Position::new(line as u32, content.start as u32),
        end: Position::new(line as u32, content.end as u32),
    }
}

fn code_lens(uri: &Url, line: usize, span: &SqlSpan) -> CodeLens {
    let range = content_range(line, span);
    CodeLens {
        range,
        command: Some(Command {
            title: CODE_LENS_TITLE.to_string(),
            command: OPEN_SQL_EDITOR.to_string(),
            arguments: Some(vec![serde_json::json!(uri), serde_json::json!(range)]),
        }),
        data: None,
    }
}
