// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Formatting-specific test helpers and custom assertions

use jsonsql_core::{FormatOutcome, FormatStage, SqlSpan};

/// Custom assertion helpers for formatting and scanning tests
pub struct FormatAssertions;

impl FormatAssertions {
    /// Assert that the outcome came from the given rung of the ladder
    pub fn assert_stage(outcome: &FormatOutcome, stage: FormatStage) {
        assert_eq!(
            outcome.stage, stage,
            "Expected stage {:?}, found {:?} (warnings: {:?})",
            stage, outcome.stage, outcome.warnings
        );
    }

    /// Assert that every fragment survives byte-for-byte
    pub fn assert_preserved(outcome: &FormatOutcome, fragments: &[&str]) {
        for fragment in fragments {
            assert!(
                outcome.text.contains(fragment),
                "Fragment '{}' lost in formatted text:\n{}",
                fragment,
                outcome.text
            );
        }
    }

    /// Assert that no placeholder token leaked into the output
    pub fn assert_no_tokens(outcome: &FormatOutcome) {
        assert!(
            !outcome.text.contains("__PLACEHOLDER_"),
            "Placeholder token left in output:\n{}",
            outcome.text
        );
    }

    /// Assert that the span's content equals `expected`
    pub fn assert_span_content(line: &str, span: &SqlSpan, expected: &str) {
        let content: String = line
            .chars()
            .skip(span.start + 1)
            .take(span.content_len())
            .collect();
        assert_eq!(content, expected, "Span {:?} covers unexpected text", span);
    }
}
