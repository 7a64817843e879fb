// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dialect Support
//!
//! SQL dialects understood by the pretty-printing backend, and the letter
//! casing policy applied to keywords, functions and data types.

use serde::{Deserialize, Serialize};
use sqlparser::dialect::{
    AnsiDialect, Dialect as ParserDialect, GenericDialect, MsSqlDialect, MySqlDialect,
    PostgreSqlDialect, SQLiteDialect,
};
use std::fmt;
use std::str::FromStr;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    /// Permissive superset grammar
    #[default]
    #[serde(alias = "sql")]
    Generic,
    /// MySQL / MariaDB
    MySql,
    /// PostgreSQL
    #[serde(alias = "postgres")]
    PostgreSql,
    /// SQLite
    Sqlite,
    /// Microsoft SQL Server (T-SQL)
    #[serde(alias = "tsql")]
    MsSql,
    /// ANSI SQL
    Ansi,
}

impl SqlDialect {
    /// All dialects, in declaration order
    pub const ALL: [SqlDialect; 6] = [
        SqlDialect::Generic,
        SqlDialect::MySql,
        SqlDialect::PostgreSql,
        SqlDialect::Sqlite,
        SqlDialect::MsSql,
        SqlDialect::Ansi,
    ];

    /// Canonical lowercase name, as used in configuration
    pub fn name(&self) -> &'static str {
        match self {
            SqlDialect::Generic => "generic",
            SqlDialect::MySql => "mysql",
            SqlDialect::PostgreSql => "postgresql",
            SqlDialect::Sqlite => "sqlite",
            SqlDialect::MsSql => "mssql",
            SqlDialect::Ansi => "ansi",
        }
    }

    /// Grammar used to check that text is well-formed in this dialect
    pub(crate) fn parser_dialect(&self) -> Box<dyn ParserDialect> {
        match self {
            SqlDialect::Generic => Box::new(GenericDialect {}),
            SqlDialect::MySql => Box::new(MySqlDialect {}),
            SqlDialect::PostgreSql => Box::new(PostgreSqlDialect {}),
            SqlDialect::Sqlite => Box::new(SQLiteDialect {}),
            SqlDialect::MsSql => Box::new(MsSqlDialect {}),
            SqlDialect::Ansi => Box::new(AnsiDialect {}),
        }
    }

    /// Layout rules used by the formatter for this dialect
    pub(crate) fn layout_dialect(&self) -> sqlformat::Dialect {
        match self {
            SqlDialect::PostgreSql => sqlformat::Dialect::PostgreSql,
            SqlDialect::MsSql => sqlformat::Dialect::SQLServer,
            _ => sqlformat::Dialect::Generic,
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SqlDialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" | "sql" => Ok(SqlDialect::Generic),
            "mysql" | "mariadb" => Ok(SqlDialect::MySql),
            "postgresql" | "postgres" => Ok(SqlDialect::PostgreSql),
            "sqlite" => Ok(SqlDialect::Sqlite),
            "mssql" | "tsql" | "sqlserver" => Ok(SqlDialect::MsSql),
            "ansi" => Ok(SqlDialect::Ansi),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

/// Error returned when a dialect name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown SQL dialect: {0}")]
pub struct UnknownDialect(pub String);

/// Letter casing policy for a class of tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterCase {
    Upper,
    Lower,
    #[default]
    Preserve,
}

impl LetterCase {
    /// The formatter's `uppercase` flag for this policy
    pub(crate) fn uppercase_flag(&self) -> Option<bool> {
        match self {
            LetterCase::Upper => Some(true),
            LetterCase::Lower => Some(false),
            LetterCase::Preserve => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_names_round_trip() {
        for dialect in SqlDialect::ALL {
            assert_eq!(dialect.name().parse::<SqlDialect>(), Ok(dialect));
        }
    }

    #[test]
    fn test_dialect_aliases() {
        assert_eq!("postgres".parse::<SqlDialect>(), Ok(SqlDialect::PostgreSql));
        assert_eq!("SQL".parse::<SqlDialect>(), Ok(SqlDialect::Generic));
        assert_eq!("tsql".parse::<SqlDialect>(), Ok(SqlDialect::MsSql));
        assert!("oracle".parse::<SqlDialect>().is_err());
    }

    #[test]
    fn test_dialect_serde() {
        let dialect: SqlDialect = serde_json::from_str("\"postgresql\"").unwrap();
        assert_eq!(dialect, SqlDialect::PostgreSql);
        assert_eq!(serde_json::to_string(&SqlDialect::MySql).unwrap(), "\"mysql\"");
    }

    #[test]
    fn test_layout_dialects() {
        assert!(matches!(
            SqlDialect::PostgreSql.layout_dialect(),
            sqlformat::Dialect::PostgreSql
        ));
        assert!(matches!(
            SqlDialect::MsSql.layout_dialect(),
            sqlformat::Dialect::SQLServer
        ));
        assert!(matches!(
            SqlDialect::MySql.layout_dialect(),
            sqlformat::Dialect::Generic
        ));
    }

    #[test]
    fn test_letter_case_flag() {
        assert_eq!(LetterCase::Upper.uppercase_flag(), Some(true));
        assert_eq!(LetterCase::Lower.uppercase_flag(), Some(false));
        assert_eq!(LetterCase::Preserve.uppercase_flag(), None);
    }
}
