// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Span Scanner
//!
//! Locates the first `"key": "value"` pair on a line whose value looks like
//! SQL, for interactive affordances that need an exact text range.
//!
//! Only the first key/value pair of a line is inspected. A line such as
//! `{"a": "SELECT 1", "b": "SELECT 2"}` yields a single span for `"a"`.

use serde::{Deserialize, Serialize};

use crate::keywords::SqlVocabulary;

/// Characters that end a line, matching the editor rope's line model
///
/// `\r\n` counts as a single break.
pub const LINE_BREAKS: [char; 7] = [
    '\n', '\r', '\u{0B}', '\u{0C}', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Split `text` into lines at every [`LINE_BREAKS`] character
///
/// A trailing break yields a final empty line, as the rope does.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest?;
        let Some(at) = current.find(LINE_BREAKS) else {
            rest = None;
            return Some(current);
        };

        let tail = &current[at..];
        let width = if tail.starts_with("\r\n") {
            2
        } else {
            tail.chars().next().map_or(1, char::len_utf8)
        };
        rest = Some(&current[at + width..]);
        Some(&current[..at])
    })
}

/// Character range of a quoted JSON value within one line
///
/// `start` is the offset of the opening quote and `end` the offset of the
/// closing quote, both counted in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqlSpan {
    pub start: usize,
    pub end: usize,
}

impl SqlSpan {
    /// Range of the value's content, quotes excluded
    pub fn content_range(&self) -> std::ops::Range<usize> {
        self.start + 1..self.end
    }

    /// Number of characters between the quotes
    pub fn content_len(&self) -> usize {
        self.end - self.start - 1
    }
}

/// Line-oriented SQL span scanner
#[derive(Debug, Clone, Copy)]
pub struct SpanScanner<'v> {
    vocabulary: &'v SqlVocabulary,
}

impl Default for SpanScanner<'static> {
    fn default() -> Self {
        Self::new(SqlVocabulary::standard())
    }
}

impl<'v> SpanScanner<'v> {
    /// Create a scanner over the given vocabulary
    pub fn new(vocabulary: &'v SqlVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Find the SQL-looking value on a single line, if any
    pub fn find_in_line(&self, line: &str) -> Option<SqlSpan> {
        if !line.contains('"') {
            return None;
        }

        let caps = self.vocabulary.line_value.captures(line)?;
        let whole = caps.get(0)?;
        let content = caps.get(1)?;

        if !self.is_sql_like(content.as_str()) {
            return None;
        }

        // The opening quote directly precedes the captured content.
        let quote_byte = line[whole.start()..].find('"')? + whole.start();
        let start = line[..quote_byte].chars().count();
        let end = start + content.as_str().chars().count() + 1;

        Some(SqlSpan { start, end })
    }

    /// Scan every line of a document
    ///
    /// Lines are split by [`split_lines`], so line numbers agree with the
    /// document store's.
    pub fn scan_lines<'a>(&'a self, text: &'a str) -> impl Iterator<Item = (usize, SqlSpan)> + 'a {
        split_lines(text)
            .enumerate()
            .filter_map(move |(number, line)| self.find_in_line(line).map(|span| (number, span)))
    }

    /// Keyword or dotted-comparison heuristic on a value body
    pub fn is_sql_like(&self, content: &str) -> bool {
        self.vocabulary.line_keyword.is_match(content)
            || self.vocabulary.dotted_comparison.is_match(content)
    }
}

/// Find the SQL span on a line using the standard vocabulary
pub fn find_sql_in_line(line: &str) -> Option<SqlSpan> {
    SpanScanner::default().find_in_line(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_quote_no_span() {
        assert_eq!(find_sql_in_line("SELECT * FROM t"), None);
        assert_eq!(find_sql_in_line(""), None);
    }

    #[test]
    fn test_span_offsets() {
        let line = r#"  "query": "SELECT * FROM t","#;
        let span = find_sql_in_line(line).unwrap();

        assert_eq!(span.start, 11);
        assert_eq!(span.end, 27);
        let chars: Vec<char> = line.chars().collect();
        assert_eq!(chars[span.start], '"');
        assert_eq!(chars[span.end], '"');

        let content: String = chars[span.content_range()].iter().collect();
        assert_eq!(content, "SELECT * FROM t");
        assert_eq!(span.content_len(), content.len());
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        assert!(find_sql_in_line(r#""q": "select 1""#).is_some());
        assert!(find_sql_in_line(r#""q": "a group   by b""#).is_some());
    }

    #[test]
    fn test_plain_value_has_no_span() {
        assert_eq!(find_sql_in_line(r#""name": "Widget 3000""#), None);
    }

    #[test]
    fn test_dotted_comparison() {
        let scanner = SpanScanner::default();
        assert!(scanner.is_sql_like("USERS.ACTIVE = 1"));
        assert!(scanner.is_sql_like("t.flag <> 'x'"));
        assert!(scanner.is_sql_like("A.B.C>=?"));
        assert!(!scanner.is_sql_like("FLAG = 1"));
        assert!(!scanner.is_sql_like("version 1.2"));
    }

    #[test]
    fn test_offsets_count_chars_not_bytes() {
        let line = r#""é": "SELECT 1""#;
        let span = find_sql_in_line(line).unwrap();
        assert_eq!(span.start, 5);
        assert_eq!(span.end, 14);
    }

    #[test]
    fn test_escaped_quote_inside_value() {
        let line = r#""q": "SELECT \"a\" FROM t""#;
        let span = find_sql_in_line(line).unwrap();
        let chars: Vec<char> = line.chars().collect();
        assert_eq!(chars[span.end], '"');
        assert_eq!(span.end, chars.len() - 1);
    }

    #[test]
    fn test_scan_lines_reports_line_numbers() {
        let text = "{\r\n  \"a\": \"SELECT 1\",\r\n  \"b\": \"hello\",\n  \"c\": \"x IN (1)\"\n}";
        let found: Vec<usize> = SpanScanner::default()
            .scan_lines(text)
            .map(|(line, _)| line)
            .collect();
        assert_eq!(found, vec![1, 3]);
    }

    #[test]
    fn test_split_lines_matches_rope_breaks() {
        let lines: Vec<&str> = split_lines("a\r\nb\rc\u{2028}d\u{85}e\n").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d", "e", ""]);
    }

    #[test]
    fn test_scan_lines_counts_unicode_separators() {
        let text = "{\n \"note\": \"a\u{2028}b\",\n \"sql\": \"SELECT id FROM t\"\n}";
        let found: Vec<usize> = SpanScanner::default()
            .scan_lines(text)
            .map(|(line, _)| line)
            .collect();
        assert_eq!(found, vec![3]);
    }
}
