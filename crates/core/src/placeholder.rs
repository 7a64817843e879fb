// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Placeholder Codec
//!
//! Shields text a SQL pretty-printer must not touch (string literals, quoted
//! identifiers, template variables) behind opaque tokens, and restores it
//! afterwards.
//!
//! ## Protocol
//!
//! ```text
//! SELECT * FROM t WHERE name = 'x' AND id = {userId}#1
//!                 │ encode
//!                 ↓
//! SELECT * FROM t WHERE name = __PLACEHOLDER_0__ AND id = __PLACEHOLDER_1__
//!                 │ external formatter
//!                 ↓
//! SELECT
//!   *
//! FROM ...  __PLACEHOLDER_0__ ... __PLACEHOLDER_1__
//!                 │ decode
//!                 ↓
//! SELECT
//!   *
//! FROM ...  'x' ... {userId}#1
//! ```
//!
//! Protection steps run in the fixed order of [`PROTECTION_STEPS`]. Quoted
//! forms come first so that `'{not_a_var}'` is captured whole as a literal.
//! The token counter is shared by all steps.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Prefix of every placeholder token
pub const TOKEN_PREFIX: &str = "__PLACEHOLDER_";

/// Suffix of every placeholder token
pub const TOKEN_SUFFIX: &str = "__";

/// Kind of protected text a placeholder stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtectedCategory {
    /// `'text'`, with `''` as the escaped quote
    SingleQuoted,
    /// `"text"`, with backslash escapes
    DoubleQuoted,
    /// `` `identifier` ``
    Backtick,
    /// `[identifier]`
    Bracketed,
    /// `{name}` or `{name}#3`
    BraceTemplate,
    /// `<name>` or `<name>#3`
    AngleTemplate,
}

impl ProtectedCategory {
    /// Whether this category is a quoting form (as opposed to a template variable)
    pub fn is_quoted(&self) -> bool {
        matches!(
            self,
            ProtectedCategory::SingleQuoted
                | ProtectedCategory::DoubleQuoted
                | ProtectedCategory::Backtick
                | ProtectedCategory::Bracketed
        )
    }

    fn pattern(&self) -> &'static str {
        match self {
            ProtectedCategory::SingleQuoted => r"'(?:[^']|'')*'",
            ProtectedCategory::DoubleQuoted => r#""(?:[^"\\]|\\.)*""#,
            ProtectedCategory::Backtick => r"`[^`]*`",
            ProtectedCategory::Bracketed => r"\[[^\]]*\]",
            ProtectedCategory::BraceTemplate => r"\{[^{}]+\}(?:#\d+)?",
            ProtectedCategory::AngleTemplate => r"<[^<>\s]+>(?:#\d+)?",
        }
    }
}

/// Order in which protected forms are swapped out
pub const PROTECTION_STEPS: [ProtectedCategory; 6] = [
    ProtectedCategory::SingleQuoted,
    ProtectedCategory::DoubleQuoted,
    ProtectedCategory::Backtick,
    ProtectedCategory::Bracketed,
    ProtectedCategory::BraceTemplate,
    ProtectedCategory::AngleTemplate,
];

static MATCHERS: LazyLock<Vec<(Regex, ProtectedCategory)>> = LazyLock::new(|| {
    PROTECTION_STEPS
        .iter()
        .map(|category| {
            (
                Regex::new(category.pattern()).expect("static regex must compile"),
                *category,
            )
        })
        .collect()
});

/// A single protected span and the token that replaced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub token: String,
    pub original: String,
    pub category: ProtectedCategory,
}

/// Ordered placeholders produced by one encode call
///
/// The position of an entry is the number embedded in its token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderMap {
    entries: Vec<Placeholder>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a protected span and return its token
    fn push(&mut self, original: &str, category: ProtectedCategory) -> String {
        let token = token_for(self.entries.len());
        self.entries.push(Placeholder {
            token: token.clone(),
            original: original.to_string(),
            category,
        });
        token
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Placeholder> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Placeholder> {
        self.entries.iter()
    }

    /// Replace every token in `text` with its original content
    ///
    /// Tokens are restored from the highest index down, each as a literal
    /// string, all occurrences.
    pub fn restore(&self, text: &str) -> String {
        self.entries
            .iter()
            .rev()
            .fold(text.to_string(), |acc, placeholder| {
                if acc.contains(&placeholder.token) {
                    acc.replace(&placeholder.token, &placeholder.original)
                } else {
                    acc
                }
            })
    }
}

/// Text with protected spans replaced by tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSql {
    pub text: String,
    pub placeholders: PlaceholderMap,
}

impl EncodedSql {
    /// Restore the placeholders into a transformed version of [`EncodedSql::text`]
    pub fn decode(&self, transformed: &str) -> String {
        self.placeholders.restore(transformed)
    }
}

/// Token for the placeholder at `index`
pub fn token_for(index: usize) -> String {
    format!("{TOKEN_PREFIX}{index}{TOKEN_SUFFIX}")
}

/// Swap protected spans for placeholder tokens
pub fn encode(sql: &str) -> EncodedSql {
    let mut placeholders = PlaceholderMap::new();
    let mut text = sql.to_string();

    for (matcher, category) in MATCHERS.iter() {
        if !matcher.is_match(&text) {
            continue;
        }
        text = matcher
            .replace_all(&text, |caps: &regex::Captures<'_>| {
                placeholders.push(&caps[0], *category)
            })
            .into_owned();
    }

    EncodedSql { text, placeholders }
}

/// Restore placeholder tokens in `text`
pub fn decode(text: &str, placeholders: &PlaceholderMap) -> String {
    placeholders.restore(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_steps_precede_template_steps() {
        let first_template = PROTECTION_STEPS
            .iter()
            .position(|c| !c.is_quoted())
            .unwrap();
        assert!(PROTECTION_STEPS[..first_template].iter().all(|c| c.is_quoted()));
        assert!(PROTECTION_STEPS[first_template..].iter().all(|c| !c.is_quoted()));
    }

    #[test]
    fn test_token_form() {
        assert_eq!(token_for(0), "__PLACEHOLDER_0__");
        assert_eq!(token_for(12), "__PLACEHOLDER_12__");
    }

    #[test]
    fn test_encode_assigns_global_indices() {
        let encoded = encode("SELECT 'a' FROM [t] WHERE id = {id} AND x = <y>#2");

        assert_eq!(
            encoded.text,
            "SELECT __PLACEHOLDER_0__ FROM __PLACEHOLDER_1__ WHERE id = __PLACEHOLDER_2__ AND x = __PLACEHOLDER_3__"
        );
        let originals: Vec<&str> = encoded
            .placeholders
            .iter()
            .map(|p| p.original.as_str())
            .collect();
        assert_eq!(originals, vec!["'a'", "[t]", "{id}", "<y>#2"]);
        assert_eq!(
            encoded.placeholders.get(1).unwrap().category,
            ProtectedCategory::Bracketed
        );
    }

    #[test]
    fn test_doubled_quote_escape() {
        let encoded = encode("SELECT 'Bob''s car' AS c");
        assert_eq!(encoded.text, "SELECT __PLACEHOLDER_0__ AS c");
        assert_eq!(encoded.placeholders.get(0).unwrap().original, "'Bob''s car'");
    }

    #[test]
    fn test_backslash_escape_in_double_quotes() {
        let encoded = encode(r#"SELECT "a\"b" FROM t"#);
        assert_eq!(encoded.text, "SELECT __PLACEHOLDER_0__ FROM t");
        assert_eq!(encoded.placeholders.get(0).unwrap().original, r#""a\"b""#);
    }

    #[test]
    fn test_template_inside_literal_stays_in_literal() {
        let encoded = encode("SELECT '{name}' FROM t");
        assert_eq!(encoded.placeholders.len(), 1);
        assert_eq!(
            encoded.placeholders.get(0).unwrap().category,
            ProtectedCategory::SingleQuoted
        );
    }

    #[test]
    fn test_comparison_operators_are_not_templates() {
        let encoded = encode("SELECT a FROM t WHERE a < b AND c > d AND e <> f");
        assert!(encoded.placeholders.is_empty());
    }

    #[test]
    fn test_restore_replaces_every_occurrence() {
        let encoded = encode("x = {v}");
        let duplicated = format!("{0} {0}", encoded.text);
        assert_eq!(encoded.decode(&duplicated), "x = {v} x = {v}");
    }

    #[test]
    fn test_restore_descending_order() {
        let mut map = PlaceholderMap::new();
        map.push("{outer}", ProtectedCategory::BraceTemplate);
        // Restoring index 1 first exposes index 0's token, which is then restored too.
        map.push("__PLACEHOLDER_0__", ProtectedCategory::SingleQuoted);

        assert_eq!(map.restore("__PLACEHOLDER_1__"), "{outer}");
    }

    #[test]
    fn test_no_protected_text() {
        let encoded = encode("SELECT 1");
        assert!(encoded.placeholders.is_empty());
        assert_eq!(encoded.text, "SELECT 1");
    }
}
