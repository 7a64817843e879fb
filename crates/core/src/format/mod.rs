// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Template-safe SQL Formatting
//!
//! Formats SQL that may contain template variables (`{name}`, `<name>#2`)
//! and quoted literals without letting the pretty-printer see them.
//!
//! ## Fallback ladder
//!
//! ```text
//! encode ─→ strict profile ──ok──→ decode
//!              │ err
//!              ↓
//!           lenient profile ──ok──→ decode
//!              │ err
//!              ↓
//!           manual pass ──non-empty──→ decode
//!              │ empty
//!              ↓
//!           original input, verbatim
//! ```
//!
//! Every failed rung is recorded as a [`FormatWarning`]; [`safe_format`]
//! itself never fails.

mod manual;
mod printer;

pub use manual::manual_format;
pub use printer::{IndentStyle, PrettyPrintOptions, SqlFormatPrinter, SqlPrettyPrinter};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dialect::SqlDialect;
use crate::error::FormatError;
use crate::placeholder;

/// Settings for [`safe_format_with`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeFormatOptions {
    /// Dialect of the strict profile
    pub dialect: SqlDialect,
    pub indent: IndentStyle,
}

impl SafeFormatOptions {
    /// Profiles tried in order before the manual pass
    pub fn profiles(&self) -> [PrettyPrintOptions; 2] {
        [
            PrettyPrintOptions::strict(self.dialect, self.indent),
            PrettyPrintOptions::lenient(self.indent),
        ]
    }
}

/// Rung of the fallback ladder that produced the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatStage {
    Strict,
    Lenient,
    Manual,
    Original,
}

/// Non-fatal problem met while formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatWarning {
    /// A pretty-printer profile failed and the next one was tried
    ProfileFailed {
        dialect: SqlDialect,
        message: String,
    },
    /// Every profile failed; the regex layout was used
    FellBackToManual,
    /// The regex layout produced nothing; the input is returned unchanged
    ReturnedOriginal,
}

impl std::fmt::Display for FormatWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatWarning::ProfileFailed { dialect, message } => {
                write!(f, "SQL formatting with the {dialect} profile failed: {message}")
            }
            FormatWarning::FellBackToManual => {
                f.write_str("SQL formatter could not parse the query; applied basic formatting")
            }
            FormatWarning::ReturnedOriginal => {
                f.write_str("SQL formatting failed; the query was left unchanged")
            }
        }
    }
}

/// Result of [`safe_format`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOutcome {
    pub text: String,
    pub stage: FormatStage,
    pub warnings: Vec<FormatWarning>,
}

impl FormatOutcome {
    /// Whether any rung below the strict profile was needed
    pub fn degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Format with the default printer and options
pub fn safe_format(sql: &str) -> FormatOutcome {
    safe_format_with(sql, &SqlFormatPrinter, &SafeFormatOptions::default())
}

/// Format `sql` through `printer`, falling back as described in the module docs
pub fn safe_format_with(
    sql: &str,
    printer: &dyn SqlPrettyPrinter,
    options: &SafeFormatOptions,
) -> FormatOutcome {
    let encoded = placeholder::encode(sql);
    debug!(
        placeholders = encoded.placeholders.len(),
        "Protected spans replaced before formatting"
    );

    let mut warnings = Vec::new();

    for (profile, stage) in options
        .profiles()
        .iter()
        .zip([FormatStage::Strict, FormatStage::Lenient])
    {
        match printer.pretty_print(&encoded.text, profile) {
            Ok(formatted) => {
                return FormatOutcome {
                    text: encoded.decode(&formatted),
                    stage,
                    warnings,
                };
            }
            Err(e) => {
                warn!("Formatting attempt failed: {}", e);
                warnings.push(profile_warning(e, profile.dialect));
            }
        }
    }

    warn!("All formatter profiles failed, using manual formatting");
    warnings.push(FormatWarning::FellBackToManual);

    let manual = manual_format(&encoded.text);
    if !manual.trim().is_empty() || sql.trim().is_empty() {
        return FormatOutcome {
            text: encoded.decode(&manual),
            stage: FormatStage::Manual,
            warnings,
        };
    }

    warnings.push(FormatWarning::ReturnedOriginal);
    FormatOutcome {
        text: sql.to_string(),
        stage: FormatStage::Original,
        warnings,
    }
}

fn profile_warning(error: FormatError, dialect: SqlDialect) -> FormatWarning {
    let message = match error {
        FormatError::Dialect { message, .. } => message,
        other => other.to_string(),
    };
    FormatWarning::ProfileFailed { dialect, message }
}
