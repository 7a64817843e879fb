// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Regex-only layout used when every pretty-printer profile has failed.
//!
//! Pure string rewriting; it cannot fail and does not parse.

use regex::Regex;
use std::sync::LazyLock;

use crate::keywords::{CLAUSE_BREAK_KEYWORDS, MANUAL_UPPERCASE_KEYWORDS, word_alternation};

const INDENT: &str = "  ";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex must compile"));

static UPPERCASE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i){}", word_alternation(MANUAL_UPPERCASE_KEYWORDS, false)))
        .expect("static regex must compile")
});

static CLAUSE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\s*({})", word_alternation(CLAUSE_BREAK_KEYWORDS, false)))
        .expect("static regex must compile")
});

static COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*").expect("static regex must compile"));

/// How a line's leading token moves the indentation level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndentRule {
    /// Top-level clause: printed flush left, body indented once
    Clause,
    /// `CASE`, `WHEN`, `IF`: indent following lines
    Open,
    /// `END`: outdent before printing
    Close,
    /// `ELSE`, `THEN`: outdent before printing, indent after
    Continue,
    Plain,
}

fn indent_rule(line: &str) -> IndentRule {
    let lead = line
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()
        .unwrap_or_default();

    match lead {
        "SELECT" | "FROM" | "WHERE" | "GROUP" | "ORDER" | "HAVING" | "LIMIT" => IndentRule::Clause,
        "CASE" | "WHEN" | "IF" => IndentRule::Open,
        "END" => IndentRule::Close,
        "ELSE" | "THEN" => IndentRule::Continue,
        _ => IndentRule::Plain,
    }
}

/// Lay out `sql` with keyword casing, clause breaks and comma breaks
pub fn manual_format(sql: &str) -> String {
    let collapsed = WHITESPACE.replace_all(sql.trim(), " ");
    let upper = UPPERCASE_KEYWORD.replace_all(&collapsed, |caps: &regex::Captures<'_>| {
        caps[0].to_uppercase()
    });
    let broken = CLAUSE_BREAK.replace_all(&upper, "\n$1");
    let broken = COMMA.replace_all(&broken, ",\n");

    let mut level = 0usize;
    let mut after_comma = false;
    let mut lines = Vec::new();

    for line in broken.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let rule = indent_rule(line);
        let printed_at = match rule {
            IndentRule::Clause => {
                level = 1;
                0
            }
            IndentRule::Open => {
                level += 1;
                level - 1
            }
            IndentRule::Close => {
                level = level.saturating_sub(1);
                level
            }
            IndentRule::Continue => level.saturating_sub(1),
            IndentRule::Plain => level,
        };
        // Lines continuing a comma list sit at least one level in.
        let printed_at = if after_comma && rule != IndentRule::Clause {
            printed_at.max(1)
        } else {
            printed_at
        };
        after_comma = line.ends_with(',');
        lines.push(format!("{}{}", INDENT.repeat(printed_at), line));
    }

    lines.join("\n")
}
