// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Document Mode
//!
//! Decides when a JSON document should be relabelled as SQL-in-JSON and when
//! it should go back to plain JSON.
//!
//! The decisions are returned, not applied: the editor integration owns the
//! capability to actually switch a document's language.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::detector::SqlDetector;

/// Language id of plain JSON documents
pub const JSON_LANGUAGE_ID: &str = "json";

/// Language id of JSON documents carrying embedded SQL
pub const SQL_IN_JSON_LANGUAGE_ID: &str = "sql-in-json";

/// Path fragments excluded from detection by default
pub const DEFAULT_EXCLUDED_PATHS: &[&str] = &[
    "package.json",
    "package-lock.json",
    "tsconfig.json",
    ".vscode",
    "node_modules",
];

/// Syntax mode of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentMode {
    Json,
    SqlInJson,
}

impl DocumentMode {
    /// Language id sent to the editor for this mode
    pub fn language_id(&self) -> &'static str {
        match self {
            DocumentMode::Json => JSON_LANGUAGE_ID,
            DocumentMode::SqlInJson => SQL_IN_JSON_LANGUAGE_ID,
        }
    }

    /// Mode for a language id, if it is one this crate manages
    pub fn from_language_id(language_id: &str) -> Option<Self> {
        match language_id {
            JSON_LANGUAGE_ID => Some(DocumentMode::Json),
            SQL_IN_JSON_LANGUAGE_ID => Some(DocumentMode::SqlInJson),
            _ => None,
        }
    }
}

/// Which documents are eligible for SQL detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    excluded_paths: Vec<String>,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_PATHS.iter().map(|p| p.to_string()).collect())
    }
}

impl FileFilter {
    /// Create a filter with the given excluded path fragments
    pub fn new(excluded_paths: Vec<String>) -> Self {
        Self { excluded_paths }
    }

    pub fn excluded_paths(&self) -> &[String] {
        &self.excluded_paths
    }

    /// A plain `.json` document outside every excluded location
    pub fn should_process(&self, path: &str, language_id: &str) -> bool {
        language_id == JSON_LANGUAGE_ID
            && path.ends_with(".json")
            && !self
                .excluded_paths
                .iter()
                .any(|fragment| path.contains(fragment.as_str()))
    }
}

/// Open/change rules for switching document modes
#[derive(Debug, Clone)]
pub struct ModeWatcher<'v> {
    filter: FileFilter,
    detector: SqlDetector<'v>,
}

impl Default for ModeWatcher<'static> {
    fn default() -> Self {
        Self::new(FileFilter::default(), SqlDetector::default())
    }
}

impl<'v> ModeWatcher<'v> {
    pub fn new(filter: FileFilter, detector: SqlDetector<'v>) -> Self {
        Self { filter, detector }
    }

    pub fn filter(&self) -> &FileFilter {
        &self.filter
    }

    /// Mode to switch to when a document is opened
    pub fn on_open(&self, path: &str, language_id: &str, text: &str) -> Option<DocumentMode> {
        if !self.filter.should_process(path, language_id) {
            return None;
        }

        if self.detector.has_sql_content(text) {
            debug!(path, "Embedded SQL found on open");
            Some(DocumentMode::SqlInJson)
        } else {
            None
        }
    }

    /// Mode to switch to after a document's content changed
    pub fn on_change(&self, path: &str, language_id: &str, text: &str) -> Option<DocumentMode> {
        let current = DocumentMode::from_language_id(language_id);
        let watched = self.filter.should_process(path, language_id)
            || current == Some(DocumentMode::SqlInJson);
        if !watched {
            return None;
        }

        let has_sql = self.detector.has_sql_content(text);
        match (has_sql, current) {
            (true, Some(DocumentMode::Json)) => Some(DocumentMode::SqlInJson),
            (false, Some(DocumentMode::SqlInJson)) => {
                debug!(path, "Embedded SQL removed, reverting to JSON");
                Some(DocumentMode::Json)
            }
            _ => None,
        }
    }
}
