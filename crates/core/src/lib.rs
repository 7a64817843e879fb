// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # JSON SQL Core
//!
//! Detection and formatting of SQL embedded in JSON string values.
//!
//! ## Overview
//!
//! ```text
//! document text ──→ SqlDetector ──→ bool ──→ ModeWatcher ──→ mode switch
//! line text     ──→ SpanScanner ──→ Option<SqlSpan>       ──→ code lens
//! SQL fragment  ──→ placeholder::encode ──→ SqlPrettyPrinter
//!                                      ──→ placeholder::decode ──→ formatted SQL
//! ```
//!
//! Every operation is a synchronous, pure function of its input. Compiled
//! regexes are process-wide statics; nothing else is shared between calls.
//!
//! ## Modules
//!
//! - [`keywords`]: shared keyword tables and compiled vocabulary
//! - [`detector`]: document-level SQL detection
//! - [`scanner`]: per-line SQL span discovery
//! - [`placeholder`]: reversible protection of literals and template variables
//! - [`format`]: pretty-printer contract and the fallback ladder
//! - [`mode`]: file eligibility and mode-switch decisions
//! - [`embed`]: conversion between JSON string bodies and SQL text
//!
//! ## Example
//!
//! ```
//! use jsonsql_core::{find_sql_in_line, has_sql_content, safe_format};
//!
//! let doc = r#"{"query": "SELECT id FROM users WHERE id = {userId}#1"}"#;
//! assert!(has_sql_content(doc));
//!
//! let span = find_sql_in_line(doc).unwrap();
//! assert_eq!(span.start, 10);
//!
//! let outcome = safe_format("SELECT id FROM users WHERE id = {userId}#1");
//! assert!(outcome.text.contains("{userId}#1"));
//! ```

pub mod detector;
pub mod dialect;
pub mod embed;
pub mod error;
pub mod format;
pub mod keywords;
pub mod mode;
pub mod placeholder;
pub mod scanner;

// Re-exports for convenience
pub use detector::{SqlDetector, has_sql_content};
pub use dialect::{LetterCase, SqlDialect, UnknownDialect};
pub use embed::{collapse_whitespace, decode_json_string_body, encode_json_string_body};
pub use error::{EmbedError, FormatError, FormatResult};
pub use format::{
    FormatOutcome, FormatStage, FormatWarning, IndentStyle, PrettyPrintOptions,
    SafeFormatOptions, SqlFormatPrinter, SqlPrettyPrinter, manual_format, safe_format,
    safe_format_with,
};
pub use keywords::{SqlVocabulary, VOCABULARY_VERSION};
pub use mode::{DocumentMode, FileFilter, ModeWatcher};
pub use placeholder::{EncodedSql, Placeholder, PlaceholderMap, ProtectedCategory};
pub use scanner::{LINE_BREAKS, SpanScanner, SqlSpan, find_sql_in_line, split_lines};
