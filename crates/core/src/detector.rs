// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Content Detector
//!
//! Classifies a whole JSON document as "contains embedded SQL" or not.
//!
//! ## Algorithm
//!
//! 1. Extract every JSON string value that is followed by `,`, `}` or `]`.
//! 2. Fast reject: values shorter than the vocabulary minimum, or containing a
//!    prose marker (`description`, `metadata`, `purpose`, `type`).
//! 3. Count whole-word uppercase keyword hits in the remaining values and sum
//!    them over the whole document.
//! 4. The document is SQL-in-JSON when the sum reaches the threshold.
//!
//! Lowercase keywords never count. JSON written by hand with `select ... from`
//! is therefore a known false negative; the threshold keeps prose such as
//! `"Tom AND Jerry"` from misfiring.

use tracing::debug;

use crate::keywords::SqlVocabulary;

/// Document-level SQL detector
#[derive(Debug, Clone, Copy)]
pub struct SqlDetector<'v> {
    vocabulary: &'v SqlVocabulary,
}

impl Default for SqlDetector<'static> {
    fn default() -> Self {
        Self::new(SqlVocabulary::standard())
    }
}

impl<'v> SqlDetector<'v> {
    /// Create a detector over the given vocabulary
    pub fn new(vocabulary: &'v SqlVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Whether the document text contains embedded SQL
    pub fn has_sql_content(&self, content: &str) -> bool {
        let total = self.keyword_count(content);
        debug!(
            total,
            threshold = self.vocabulary.threshold,
            "SQL keyword hits in document"
        );
        total >= self.vocabulary.threshold
    }

    /// Sum of keyword hits over every qualifying string value in the document
    pub fn keyword_count(&self, content: &str) -> usize {
        self.candidate_values(content)
            .map(|value| self.vocabulary.document_keyword.find_iter(value).count())
            .sum()
    }

    /// String bodies that pass the fast-reject filter
    fn candidate_values<'a>(&'a self, content: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.vocabulary
            .json_value
            .captures_iter(content)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .filter(move |value| self.is_candidate(value))
    }

    fn is_candidate(&self, value: &str) -> bool {
        value.chars().count() >= self.vocabulary.min_candidate_chars
            && !self.vocabulary.excluded_marker.is_match(value)
    }
}

/// Detect embedded SQL using the standard vocabulary
pub fn has_sql_content(content: &str) -> bool {
    SqlDetector::default().has_sql_content(content)
}
