// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Pretty-printer contract and the default `sqlparser` + `sqlformat` backend.

use serde::{Deserialize, Serialize};
use sqlformat::{FormatOptions, Indent, QueryParams};
use sqlparser::parser::Parser;

use crate::dialect::{LetterCase, SqlDialect};
use crate::error::FormatError;

/// Indentation used by the pretty-printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndentStyle {
    Spaces(u8),
    Tabs,
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(2)
    }
}

/// Configuration handed to a [`SqlPrettyPrinter`] for one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrettyPrintOptions {
    pub dialect: SqlDialect,
    pub indent: IndentStyle,
    pub keyword_case: LetterCase,
    pub function_case: LetterCase,
    pub data_type_case: LetterCase,
    /// Reject text the dialect's grammar cannot parse before laying it out
    pub check_grammar: bool,
}

impl PrettyPrintOptions {
    /// Configured dialect with every token class uppercased
    pub fn strict(dialect: SqlDialect, indent: IndentStyle) -> Self {
        Self {
            dialect,
            indent,
            keyword_case: LetterCase::Upper,
            function_case: LetterCase::Upper,
            data_type_case: LetterCase::Upper,
            check_grammar: true,
        }
    }

    /// Generic dialect with the author's casing left alone
    ///
    /// Skips the grammar check, so fragments such as a bare predicate or an
    /// unfinished query are still laid out.
    pub fn lenient(indent: IndentStyle) -> Self {
        Self {
            dialect: SqlDialect::Generic,
            indent,
            keyword_case: LetterCase::Preserve,
            function_case: LetterCase::Preserve,
            data_type_case: LetterCase::Preserve,
            check_grammar: false,
        }
    }
}

/// An external, possibly failing SQL layout engine
pub trait SqlPrettyPrinter {
    /// Format `sql`, or fail with a dialect-specific error
    fn pretty_print(&self, sql: &str, options: &PrettyPrintOptions) -> Result<String, FormatError>;
}

impl<P: SqlPrettyPrinter + ?Sized> SqlPrettyPrinter for &P {
    fn pretty_print(&self, sql: &str, options: &PrettyPrintOptions) -> Result<String, FormatError> {
        (**self).pretty_print(sql, options)
    }
}

/// Default printer: validates with `sqlparser`, lays out with `sqlformat`
///
/// `sqlformat` itself accepts any token stream, so the parse step is what
/// makes a dialect reject malformed input. Profiles with `check_grammar`
/// unset go straight to layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlFormatPrinter;

impl SqlPrettyPrinter for SqlFormatPrinter {
    fn pretty_print(&self, sql: &str, options: &PrettyPrintOptions) -> Result<String, FormatError> {
        if sql.trim().is_empty() {
            return Err(FormatError::EmptyInput);
        }

        if options.check_grammar {
            let dialect = options.dialect.parser_dialect();
            Parser::parse_sql(dialect.as_ref(), sql).map_err(|e| FormatError::Dialect {
                dialect: options.dialect,
                message: e.to_string(),
            })?;
        }

        // sqlformat has a single casing switch; keywords drive it.
        let format_options = FormatOptions {
            indent: match options.indent {
                IndentStyle::Spaces(width) => Indent::Spaces(width),
                IndentStyle::Tabs => Indent::Tabs,
            },
            uppercase: options.keyword_case.uppercase_flag(),
            dialect: options.dialect.layout_dialect(),
            ..FormatOptions::default()
        };

        let formatted = sqlformat::format(sql, &QueryParams::None, &format_options);
        if formatted.trim().is_empty() {
            return Err(FormatError::EmptyOutput {
                dialect: options.dialect,
            });
        }

        Ok(formatted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_uppercases_keywords() {
        let options = PrettyPrintOptions::strict(SqlDialect::Generic, IndentStyle::default());
        let formatted = SqlFormatPrinter
            .pretty_print("select id from users where id = 1", &options)
            .unwrap();

        assert!(formatted.contains("SELECT"));
        assert!(formatted.contains("FROM"));
        assert!(formatted.contains('\n'));
    }

    #[test]
    fn test_lenient_preserves_case() {
        let options = PrettyPrintOptions::lenient(IndentStyle::default());
        let formatted = SqlFormatPrinter
            .pretty_print("select id from users", &options)
            .unwrap();

        assert!(formatted.contains("select"));
        assert!(!formatted.contains("SELECT"));
    }

    #[test]
    fn test_rejects_malformed_sql() {
        let options = PrettyPrintOptions::strict(SqlDialect::PostgreSql, IndentStyle::default());
        let err = SqlFormatPrinter
            .pretty_print("SELECT FROM FROM FROM (((", &options)
            .unwrap_err();

        assert!(matches!(
            err,
            FormatError::Dialect {
                dialect: SqlDialect::PostgreSql,
                ..
            }
        ));
    }

    #[test]
    fn test_lenient_lays_out_fragments() {
        let options = PrettyPrintOptions::lenient(IndentStyle::default());

        for fragment in ["x = 1 AND y = 2", "USERS.ACTIVE = 1", "select a from t where"] {
            let formatted = SqlFormatPrinter.pretty_print(fragment, &options).unwrap();
            assert!(!formatted.trim().is_empty(), "{fragment}");
        }
    }

    #[test]
    fn test_strict_rejects_what_lenient_accepts() {
        let strict = PrettyPrintOptions::strict(SqlDialect::Generic, IndentStyle::default());
        let lenient = PrettyPrintOptions::lenient(IndentStyle::default());

        assert!(SqlFormatPrinter.pretty_print("USERS.ACTIVE = 1", &strict).is_err());
        assert!(SqlFormatPrinter.pretty_print("USERS.ACTIVE = 1", &lenient).is_ok());
    }

    #[test]
    fn test_rejects_empty_input() {
        let options = PrettyPrintOptions::lenient(IndentStyle::Tabs);
        assert_eq!(
            SqlFormatPrinter.pretty_print("  ", &options),
            Err(FormatError::EmptyInput)
        );
    }
}
