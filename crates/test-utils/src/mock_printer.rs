// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock pretty-printers for testing
//!
//! Stand-ins for the external formatter so tests can pick which rung of the
//! fallback ladder is reached.

use jsonsql_core::{FormatError, PrettyPrintOptions, SqlDialect, SqlPrettyPrinter};
use std::cell::RefCell;

/// Returns its input unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPrinter;

impl SqlPrettyPrinter for IdentityPrinter {
    fn pretty_print(&self, sql: &str, _options: &PrettyPrintOptions) -> Result<String, FormatError> {
        Ok(sql.to_string())
    }
}

/// Rejects everything under every dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingPrinter;

impl SqlPrettyPrinter for FailingPrinter {
    fn pretty_print(&self, _sql: &str, options: &PrettyPrintOptions) -> Result<String, FormatError> {
        Err(FormatError::Dialect {
            dialect: options.dialect,
            message: "mock printer rejects all input".to_string(),
        })
    }
}

/// Fails for the listed dialects and applies `transform` otherwise
pub struct ScriptedPrinter {
    failing: Vec<SqlDialect>,
    transform: Box<dyn Fn(&str) -> String>,
}

impl ScriptedPrinter {
    /// Create a printer that succeeds with the identity transform
    pub fn new() -> Self {
        Self {
            failing: Vec::new(),
            transform: Box::new(str::to_string),
        }
    }

    /// Fail whenever `dialect` is requested
    pub fn fail_on(mut self, dialect: SqlDialect) -> Self {
        self.failing.push(dialect);
        self
    }

    /// Output produced on success
    pub fn with_transform(mut self, transform: impl Fn(&str) -> String + 'static) -> Self {
        self.transform = Box::new(transform);
        self
    }
}

impl Default for ScriptedPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlPrettyPrinter for ScriptedPrinter {
    fn pretty_print(&self, sql: &str, options: &PrettyPrintOptions) -> Result<String, FormatError> {
        if self.failing.contains(&options.dialect) {
            return Err(FormatError::Dialect {
                dialect: options.dialect,
                message: format!("scripted failure for {}", options.dialect),
            });
        }
        Ok((self.transform)(sql))
    }
}

/// Records every call, then delegates to an inner printer
pub struct RecordingPrinter<P> {
    inner: P,
    calls: RefCell<Vec<(String, PrettyPrintOptions)>>,
}

impl<P: SqlPrettyPrinter> RecordingPrinter<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Inputs and options seen so far, in call order
    pub fn calls(&self) -> Vec<(String, PrettyPrintOptions)> {
        self.calls.borrow().clone()
    }
}

impl<P: SqlPrettyPrinter> SqlPrettyPrinter for RecordingPrinter<P> {
    fn pretty_print(&self, sql: &str, options: &PrettyPrintOptions) -> Result<String, FormatError> {
        self.calls.borrow_mut().push((sql.to_string(), *options));
        self.inner.pretty_print(sql, options)
    }
}
