// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for formatting and JSON embedding

use thiserror::Error;

use crate::dialect::SqlDialect;

/// Result type alias for pretty-printer operations
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors raised by a pretty-printer attempt
///
/// These never escape [`safe_format`](crate::format::safe_format); they are
/// turned into warnings and the next fallback is tried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The text does not parse under the requested dialect
    #[error("{dialect} dialect rejected the query: {message}")]
    Dialect { dialect: SqlDialect, message: String },

    /// Nothing to format
    #[error("No SQL text to format")]
    EmptyInput,

    /// The backend produced no text
    #[error("{dialect} formatter produced empty output")]
    EmptyOutput { dialect: SqlDialect },

    /// Any other backend failure
    #[error("Formatter failed: {0}")]
    Backend(String),
}

/// Errors converting between raw JSON string bodies and SQL text
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The raw text is not a valid JSON string body
    #[error("Invalid JSON string content: {0}")]
    InvalidJsonString(#[from] serde_json::Error),
}
