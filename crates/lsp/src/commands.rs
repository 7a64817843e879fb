// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Workspace Commands
//!
//! `workspace/executeCommand` handlers for editing embedded SQL.
//!
//! | Command                 | Arguments            | Effect                                  |
//! |-------------------------|----------------------|-----------------------------------------|
//! | `jsonsql.openSqlEditor` | `[uri, range]`       | returns the decoded, formatted SQL      |
//! | `jsonsql.formatSql`     | `[uri, range]`       | rewrites the value with formatted SQL   |
//! | `jsonsql.saveSql`       | `[uri, range, sql]`  | rewrites the value with the given SQL   |
//!
//! `range` always covers the value's content without its quotes, as produced
//! by the code lenses. Written SQL is flattened to a single line.

use jsonsql_core::{
    EmbedError, FormatOutcome, FormatStage, SafeFormatOptions, SqlFormatPrinter,
    decode_json_string_body, encode_json_string_body, safe_format_with,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tower_lsp::jsonrpc;
use tower_lsp::lsp_types::{Range, TextEdit, Url, WorkspaceEdit};

use crate::document::Document;

pub const OPEN_SQL_EDITOR: &str = "jsonsql.openSqlEditor";
pub const FORMAT_SQL: &str = "jsonsql.formatSql";
pub const SAVE_SQL: &str = "jsonsql.saveSql";

/// Commands advertised in the server capabilities
pub const ALL_COMMANDS: [&str; 3] = [OPEN_SQL_EDITOR, FORMAT_SQL, SAVE_SQL];

/// A parsed `workspace/executeCommand` request
#[derive(Debug, Clone, PartialEq)]
pub enum SqlCommand {
    OpenSqlEditor { uri: Url, range: Range },
    FormatSql { uri: Url, range: Range },
    SaveSql { uri: Url, range: Range, sql: String },
}

impl SqlCommand {
    /// Parse a command name and its positional arguments
    pub fn parse(command: &str, arguments: &[Value]) -> Result<Self, CommandError> {
        match command {
            OPEN_SQL_EDITOR => Ok(SqlCommand::OpenSqlEditor {
                uri: argument(command, arguments, 0, "uri")?,
                range: argument(command, arguments, 1, "range")?,
            }),
            FORMAT_SQL => Ok(SqlCommand::FormatSql {
                uri: argument(command, arguments, 0, "uri")?,
                range: argument(command, arguments, 1, "range")?,
            }),
            SAVE_SQL => Ok(SqlCommand::SaveSql {
                uri: argument(command, arguments, 0, "uri")?,
                range: argument(command, arguments, 1, "range")?,
                sql: argument(command, arguments, 2, "sql")?,
            }),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }

    /// Document the command operates on
    pub fn uri(&self) -> &Url {
        match self {
            SqlCommand::OpenSqlEditor { uri, .. }
            | SqlCommand::FormatSql { uri, .. }
            | SqlCommand::SaveSql { uri, .. } => uri,
        }
    }
}

fn argument<T: DeserializeOwned>(
    command: &str,
    arguments: &[Value],
    index: usize,
    name: &'static str,
) -> Result<T, CommandError> {
    let value = arguments
        .get(index)
        .ok_or_else(|| CommandError::MissingArgument {
            command: command.to_string(),
            name,
        })?;

    serde_json::from_value(value.clone()).map_err(|source| CommandError::InvalidArgument {
        command: command.to_string(),
        name,
        source,
    })
}

/// Result of `jsonsql.openSqlEditor`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSqlResult {
    /// Formatted, unescaped SQL
    pub sql: String,
    /// Content range the SQL was read from
    pub range: Range,
    pub stage: FormatStage,
    /// User-facing descriptions of fallback steps
    pub warnings: Vec<String>,
}

/// Raw content of the value at `range`, unescaped
fn read_sql(document: &Document, range: &Range) -> Result<String, CommandError> {
    let raw = document
        .text_in_range(range)
        .ok_or(CommandError::RangeOutOfBounds(*range))?;
    Ok(decode_json_string_body(&raw)?)
}

fn check_range(document: &Document, range: &Range) -> Result<(), CommandError> {
    document
        .text_in_range(range)
        .map(|_| ())
        .ok_or(CommandError::RangeOutOfBounds(*range))
}

/// Decode and format the SQL at `range`
pub fn open_sql_editor(
    document: &Document,
    range: Range,
    options: &SafeFormatOptions,
) -> Result<OpenSqlResult, CommandError> {
    let sql = read_sql(document, &range)?;
    let outcome = safe_format_with(&sql, &SqlFormatPrinter, options);

    Ok(OpenSqlResult {
        warnings: outcome.warnings.iter().map(ToString::to_string).collect(),
        sql: outcome.text,
        range,
        stage: outcome.stage,
    })
}

/// Edit replacing the SQL at `range` with its formatted, flattened form
pub fn format_sql(
    document: &Document,
    range: Range,
    options: &SafeFormatOptions,
) -> Result<(TextEdit, FormatOutcome), CommandError> {
    let sql = read_sql(document, &range)?;
    let outcome = safe_format_with(&sql, &SqlFormatPrinter, options);
    let edit = TextEdit::new(range, encode_json_string_body(&outcome.text));
    Ok((edit, outcome))
}

/// Edit replacing the SQL at `range` with `sql`
pub fn save_sql(document: &Document, range: Range, sql: &str) -> Result<TextEdit, CommandError> {
    check_range(document, &range)?;
    Ok(TextEdit::new(range, encode_json_string_body(sql)))
}

/// Wrap a single edit for `workspace/applyEdit`
pub fn workspace_edit(uri: Url, edit: TextEdit) -> WorkspaceEdit {
    WorkspaceEdit {
        changes: Some(HashMap::from([(uri, vec![edit])])),
        ..Default::default()
    }
}

/// Command errors
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command}: missing argument '{name}'")]
    MissingArgument { command: String, name: &'static str },

    #[error("{command}: invalid argument '{name}': {source}")]
    InvalidArgument {
        command: String,
        name: &'static str,
        source: serde_json::Error,
    },

    #[error("Document not open: {0}")]
    DocumentNotOpen(Url),

    #[error("Range {0:?} is outside the document")]
    RangeOutOfBounds(Range),

    #[error(transparent)]
    Embed(#[from] EmbedError),
}

impl From<CommandError> for jsonrpc::Error {
    fn from(error: CommandError) -> Self {
        jsonrpc::Error::invalid_params(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tower_lsp::lsp_types::Position;

    fn range(start: u32, end: u32) -> Range {
        Range {
            start: Position::new(0, start),
            end: Position::new(0, end),
        }
    }

    #[test]
    fn test_parse_open_sql_editor() {
        let command = SqlCommand::parse(
            OPEN_SQL_EDITOR,
            &[json!("file:///a.json"), json!(range(7, 15))],
        )
        .unwrap();

        assert_eq!(
            command,
            SqlCommand::OpenSqlEditor {
                uri: Url::parse("file:///a.json").unwrap(),
                range: range(7, 15),
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            SqlCommand::parse("jsonsql.unknown", &[]),
            Err(CommandError::UnknownCommand(_))
        ));
        assert!(matches!(
            SqlCommand::parse(SAVE_SQL, &[json!("file:///a.json"), json!(range(0, 1))]),
            Err(CommandError::MissingArgument { name: "sql", .. })
        ));
        assert!(matches!(
            SqlCommand::parse(FORMAT_SQL, &[json!("not a uri"), json!(range(0, 1))]),
            Err(CommandError::InvalidArgument { name: "uri", .. })
        ));
    }

    #[test]
    fn test_error_maps_to_invalid_params() {
        let error: jsonrpc::Error = CommandError::UnknownCommand("x".to_string()).into();
        assert_eq!(error.code, jsonrpc::ErrorCode::InvalidParams);
    }

    #[test]
    fn test_workspace_edit_targets_uri() {
        let uri = Url::parse("file:///a.json").unwrap();
        let edit = workspace_edit(uri.clone(), TextEdit::new(range(0, 1), "x".to_string()));

        let changes = edit.changes.unwrap();
        assert_eq!(changes[&uri].len(), 1);
    }
}
