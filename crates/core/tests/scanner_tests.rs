// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Span scanner integration tests

use jsonsql_core::{SpanScanner, SqlVocabulary, find_sql_in_line};
use jsonsql_test_utils::{FormatAssertions, JsonFixtures};

#[test]
fn test_single_span_per_line() {
    let line = r#"{"a": "SELECT * FROM t", "b": "SELECT * FROM u"}"#;
    let span = find_sql_in_line(line).expect("first value is SQL");

    assert_eq!(span.start, 6);
    FormatAssertions::assert_span_content(line, &span, "SELECT * FROM t");
}

#[test]
fn test_only_first_pair_is_considered() {
    // The first value is not SQL, so the SQL in the second is not reported.
    let line = r#"{"name": "report", "sql": "SELECT 1"}"#;
    assert_eq!(find_sql_in_line(line), None);
}

#[test]
fn test_scanner_is_case_insensitive_unlike_detector() {
    let line = r#""sql": "select * from table where x""#;
    assert!(find_sql_in_line(line).is_some());
}

#[test]
fn test_partial_predicates() {
    let scanner = SpanScanner::new(SqlVocabulary::standard());
    for value in [
        "STATUS IS NULL",
        "x NOT NULL",
        "PRAGMA foreign_keys",
        "ORDERS.STATUS = 'open'",
        "T.ID != 42",
    ] {
        assert!(scanner.is_sql_like(value), "{value}");
    }
    for value in ["hello world", "v1.2.3", "https://example.com", "Indiana"] {
        assert!(!scanner.is_sql_like(value), "{value}");
    }
}

#[test]
fn test_array_elements_have_no_colon() {
    assert_eq!(find_sql_in_line(r#"  "SELECT * FROM t","#), None);
}

#[test]
fn test_unterminated_value() {
    assert_eq!(find_sql_in_line(r#""sql": "SELECT * FROM t"#), None);
}

#[test]
fn test_scan_crlf_document() {
    let doc = JsonFixtures::crlf_document();
    let spans: Vec<_> = SpanScanner::default().scan_lines(doc).collect();

    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].0, 1);
    assert_eq!(spans[1].0, 2);

    let line = doc.lines().nth(2).unwrap();
    FormatAssertions::assert_span_content(
        line,
        &spans[1].1,
        "SELECT * FROM ORDERS WHERE STATUS IN (1, 2)",
    );
}

#[test]
fn test_generated_document_lines() {
    let doc = JsonFixtures::lines_document(&[
        ("title", "Monthly report"),
        ("query", "SELECT \"total\" FROM sales"),
    ]);
    let spans: Vec<_> = SpanScanner::default().scan_lines(&doc).collect();

    assert_eq!(spans.len(), 1);
    let (line_number, span) = spans[0];
    assert_eq!(line_number, 2);
    FormatAssertions::assert_span_content(
        doc.lines().nth(line_number).unwrap(),
        &span,
        r#"SELECT \"total\" FROM sales"#,
    );
}
