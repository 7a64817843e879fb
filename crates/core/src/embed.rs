// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # JSON String Embedding
//!
//! Moves SQL between its raw form inside a JSON document (escaped, one line)
//! and editable text (unescaped, possibly multi-line).

use regex::Regex;
use std::sync::LazyLock;

use crate::error::EmbedError;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex must compile"));

/// Unescape the characters found between a JSON string's quotes
///
/// ```
/// use jsonsql_core::embed::decode_json_string_body;
///
/// let sql = decode_json_string_body(r#"SELECT \"a\"\nFROM t"#).unwrap();
/// assert_eq!(sql, "SELECT \"a\"\nFROM t");
/// ```
pub fn decode_json_string_body(raw: &str) -> Result<String, EmbedError> {
    let quoted = format!("\"{raw}\"");
    Ok(serde_json::from_str::<String>(&quoted)?)
}

/// Flatten SQL to one line and escape it for use between JSON quotes
///
/// ```
/// use jsonsql_core::embed::encode_json_string_body;
///
/// let body = encode_json_string_body("SELECT \"a\"\n  FROM t\n");
/// assert_eq!(body, r#"SELECT \"a\" FROM t"#);
/// ```
pub fn encode_json_string_body(sql: &str) -> String {
    let single_line = collapse_whitespace(sql);
    let quoted = serde_json::Value::String(single_line).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

/// Replace every whitespace run with one space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}
