// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Vocabulary
//!
//! Single table of keyword lists, thresholds and compiled patterns shared by
//! the document detector, the line scanner and the manual formatter.
//!
//! The two heuristics intentionally use different vocabularies and different
//! case rules:
//!
//! | consumer          | list                  | case                    |
//! |-------------------|-----------------------|-------------------------|
//! | [`SqlDetector`]   | [`DOCUMENT_KEYWORDS`] | uppercase only          |
//! | [`SpanScanner`]   | [`LINE_KEYWORDS`]     | case-insensitive        |
//!
//! Bump [`VOCABULARY_VERSION`] whenever any list below changes, since it
//! changes detection outcomes on existing documents.
//!
//! [`SqlDetector`]: crate::detector::SqlDetector
//! [`SpanScanner`]: crate::scanner::SpanScanner

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Version of the keyword tables in this module
pub const VOCABULARY_VERSION: u32 = 1;

/// Keywords counted by the document-level detector (matched uppercase only)
pub const DOCUMENT_KEYWORDS: &[&str] = &[
    "SELECT",
    "FROM",
    "WHERE",
    "INSERT",
    "UPDATE",
    "DELETE",
    "CREATE",
    "DROP",
    "ALTER",
    "JOIN",
    "INNER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "OUTER JOIN",
    "GROUP BY",
    "ORDER BY",
    "HAVING",
    "UNION",
    "DISTINCT",
    "COUNT",
    "SUM",
    "AVG",
    "MAX",
    "MIN",
    "CASE",
    "WHEN",
    "UPPER",
    "LOWER",
    "GLOB",
    "LIKE",
    "IN",
    "BETWEEN",
    "SUBSTR",
    "IFNULL",
    "COALESCE",
    "CAST",
    "CONVERT",
    "IS NULL",
    "IS NOT NULL",
    "AND",
    "OR",
    "NOT",
    "EXISTS",
];

/// Keywords that mark a single JSON value as SQL-like (matched case-insensitively)
///
/// Multi-word entries accept any run of whitespace between the words.
pub const LINE_KEYWORDS: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "CREATE", "DROP", "ALTER", "JOIN", "GROUP BY",
    "ORDER BY", "PRAGMA", "WHERE", "AND", "OR", "LIKE", "GLOB", "IN", "IS NULL", "NOT NULL",
];

/// Substrings that mark a JSON value as prose rather than SQL (case-insensitive)
pub const EXCLUDED_FIELD_MARKERS: &[&str] = &["description", "metadata", "purpose", "type"];

/// Values shorter than this many characters never count toward detection
pub const MIN_CANDIDATE_CHARS: usize = 10;

/// Minimum number of keyword hits across a document to classify it as SQL-in-JSON
pub const DETECTION_THRESHOLD: usize = 3;

/// Keywords the manual formatter uppercases
pub const MANUAL_UPPERCASE_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "AND", "OR", "NOT", "IN", "IS", "NULL", "LIKE", "GLOB", "BETWEEN",
    "EXISTS", "AS", "ON", "JOIN", "INNER", "LEFT", "RIGHT", "OUTER", "CROSS", "FULL", "GROUP",
    "ORDER", "BY", "HAVING", "LIMIT", "OFFSET", "UNION", "ALL", "DISTINCT", "CASE", "WHEN",
    "THEN", "ELSE", "END", "IF", "INSERT", "INTO", "VALUES", "UPDATE", "SET", "DELETE", "CREATE",
    "DROP", "ALTER", "TABLE", "INDEX", "VIEW", "ASC", "DESC", "COUNT", "SUM", "AVG", "MAX", "MIN",
    "UPPER", "LOWER", "SUBSTR", "IFNULL", "COALESCE", "CAST", "CONVERT", "PRAGMA", "WITH",
];

/// Clauses the manual formatter starts on a fresh line
pub const CLAUSE_BREAK_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "GROUP BY", "ORDER BY", "HAVING", "LIMIT",
];

/// Compiled form of the keyword tables
///
/// Built once per process by [`SqlVocabulary::standard`] and handed to the
/// detector and scanner by reference.
#[derive(Debug)]
pub struct SqlVocabulary {
    /// JSON string value followed by `,`, `}` or `]`; group 1 is the body
    pub(crate) json_value: Regex,

    /// Whole-word, case-sensitive document keywords
    pub(crate) document_keyword: Regex,

    /// `: "value"` key/value shape on a single line; group 1 is the body
    pub(crate) line_value: Regex,

    /// Whole-word, case-insensitive line keywords
    pub(crate) line_keyword: Regex,

    /// `TABLE.COLUMN = ?` style predicate
    pub(crate) dotted_comparison: Regex,

    /// Case-insensitive prose markers
    pub(crate) excluded_marker: Regex,

    pub(crate) min_candidate_chars: usize,
    pub(crate) threshold: usize,
}

static STANDARD: LazyLock<SqlVocabulary> = LazyLock::new(SqlVocabulary::build);

impl SqlVocabulary {
    /// The process-wide vocabulary compiled from this module's tables
    pub fn standard() -> &'static SqlVocabulary {
        &STANDARD
    }

    /// Version of the tables this vocabulary was compiled from
    pub fn version(&self) -> u32 {
        VOCABULARY_VERSION
    }

    /// Minimum value length considered by the detector
    pub fn min_candidate_chars(&self) -> usize {
        self.min_candidate_chars
    }

    /// Keyword hits required for a positive detection
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    fn build() -> Self {
        Self {
            json_value: Regex::new(r#""([^"\\]*(?:\\.[^"\\]*)*)"\s*[,}\]]"#)
                .expect("static regex must compile"),
            document_keyword: Regex::new(&word_alternation(DOCUMENT_KEYWORDS, false))
                .expect("static regex must compile"),
            line_value: Regex::new(r#":\s*"([^"\\]*(?:\\.[^"\\]*)*)""#)
                .expect("static regex must compile"),
            line_keyword: RegexBuilder::new(&word_alternation(LINE_KEYWORDS, true))
                .case_insensitive(true)
                .build()
                .expect("static regex must compile"),
            dotted_comparison: RegexBuilder::new(
                r"\b[A-Z0-9_]+(?:\.[A-Z0-9_]+)+\s*(?:=|<>|!=|>|<|>=|<=)\s*(?:\?|'.*?'|\d+)",
            )
            .case_insensitive(true)
            .build()
            .expect("static regex must compile"),
            excluded_marker: RegexBuilder::new(&EXCLUDED_FIELD_MARKERS.join("|"))
                .case_insensitive(true)
                .build()
                .expect("static regex must compile"),
            min_candidate_chars: MIN_CANDIDATE_CHARS,
            threshold: DETECTION_THRESHOLD,
        }
    }
}

/// Build `\b(?:K1|K2|...)\b`, preserving list order for leftmost-first matching
///
/// With `flexible_spaces` the single space inside multi-word keywords matches
/// any whitespace run.
pub(crate) fn word_alternation(keywords: &[&str], flexible_spaces: bool) -> String {
    let alternatives: Vec<String> = keywords
        .iter()
        .map(|keyword| {
            let escaped = regex::escape(keyword);
            if flexible_spaces {
                escaped.replace(' ', r"\s+")
            } else {
                escaped
            }
        })
        .collect();

    format!(r"\b(?:{})\b", alternatives.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_vocabulary_compiles() {
        let vocab = SqlVocabulary::standard();
        assert_eq!(vocab.version(), VOCABULARY_VERSION);
        assert_eq!(vocab.threshold(), 3);
        assert_eq!(vocab.min_candidate_chars(), 10);
    }

    #[test]
    fn test_word_alternation_escapes_and_orders() {
        let pattern = word_alternation(&["GROUP BY", "IN"], true);
        assert_eq!(pattern, r"\b(?:GROUP\s+BY|IN)\b");

        let strict = word_alternation(&["IS NULL"], false);
        assert_eq!(strict, r"\b(?:IS NULL)\b");
    }

    #[test]
    fn test_document_keywords_are_uppercase() {
        for keyword in DOCUMENT_KEYWORDS {
            assert_eq!(*keyword, keyword.to_uppercase());
        }
    }

    #[test]
    fn test_clause_breaks_are_known_to_manual_formatter() {
        for clause in CLAUSE_BREAK_KEYWORDS {
            for word in clause.split(' ') {
                assert!(
                    MANUAL_UPPERCASE_KEYWORDS.contains(&word),
                    "{word} missing from manual keyword list"
                );
            }
        }
    }
}
