// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Server Configuration
//!
//! Settings for SQL formatting and document detection.
//!
//! ## Sources
//!
//! Later sources override earlier ones, field by field:
//!
//! 1. Built-in defaults
//! 2. `.jsonsql.yaml` at the workspace root
//! 3. `initializationOptions.jsonSql`
//! 4. `jsonSql` section of `workspace/didChangeConfiguration`
//!
//! ## Example
//!
//! ```yaml
//! dialect: postgresql
//! indentWidth: 4
//! useTabs: false
//! excludedPaths:
//!   - node_modules
//!   - fixtures
//! codeLens: true
//! ```

use jsonsql_core::mode::DEFAULT_EXCLUDED_PATHS;
use jsonsql_core::{FileFilter, IndentStyle, SafeFormatOptions, SqlDialect};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the workspace configuration file
pub const CONFIG_FILE_NAME: &str = ".jsonsql.yaml";

/// Key of the settings section sent by the client
pub const SETTINGS_SECTION: &str = "jsonSql";

/// Largest accepted indent width
pub const MAX_INDENT_WIDTH: u8 = 16;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Dialect of the strict formatting profile
    pub dialect: SqlDialect,

    /// Spaces per indentation level
    pub indent_width: u8,

    /// Indent with tabs instead of spaces
    pub use_tabs: bool,

    /// Path fragments excluded from SQL detection
    pub excluded_paths: Vec<String>,

    /// Show "Open in SQL Editor" lenses
    pub code_lens: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dialect: SqlDialect::Generic,
            indent_width: 2,
            use_tabs: false,
            excluded_paths: DEFAULT_EXCLUDED_PATHS.iter().map(|p| p.to_string()).collect(),
            code_lens: true,
        }
    }
}

impl ServerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indent_width == 0 || self.indent_width > MAX_INDENT_WIDTH {
            return Err(ConfigError::InvalidIndentWidth(self.indent_width));
        }
        Ok(())
    }

    /// Return a copy with the keys present in `overrides` replaced
    ///
    /// Keys missing from `overrides` keep their current value. The result is
    /// validated.
    pub fn with_overrides(&self, overrides: &Value) -> Result<Self, ConfigError> {
        let Value::Object(fields) = overrides else {
            return Err(ConfigError::NotAnObject);
        };

        let mut merged = serde_json::to_value(self)?;
        if let Value::Object(current) = &mut merged {
            for (key, value) in fields {
                current.insert(key.clone(), value.clone());
            }
        }

        let config: ServerConfig = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML configuration file body on top of the defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_yaml::from_str(yaml)?;
        match value {
            Value::Null => Ok(Self::default()),
            other => Self::default().with_overrides(&other),
        }
    }

    /// Load `.jsonsql.yaml` from `root`, or the defaults when there is none
    pub fn load_from_workspace(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            debug!("No {} in {}", CONFIG_FILE_NAME, root.display());
            return Ok(Self::default());
        }

        let body = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_yaml_str(&body)
    }

    /// The `jsonSql` section of a client settings payload
    pub fn settings_section(settings: &Value) -> Option<&Value> {
        settings.get(SETTINGS_SECTION).filter(|section| !section.is_null())
    }

    /// Options for the formatting ladder
    pub fn format_options(&self) -> SafeFormatOptions {
        SafeFormatOptions {
            dialect: self.dialect,
            indent: if self.use_tabs {
                IndentStyle::Tabs
            } else {
                IndentStyle::Spaces(self.indent_width)
            },
        }
    }

    /// File filter for mode detection
    pub fn file_filter(&self) -> FileFilter {
        FileFilter::new(self.excluded_paths.clone())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Indent width outside `1..=16`
    #[error("Invalid indent width {0}: expected 1..={MAX_INDENT_WIDTH}")]
    InvalidIndentWidth(u8),

    /// Settings payload is not a JSON object
    #[error("Settings must be an object")]
    NotAnObject,

    /// Settings value of the wrong shape
    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    /// Malformed YAML file
    #[error("Invalid configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration file could not be read
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.dialect, SqlDialect::Generic);
        assert_eq!(config.indent_width, 2);
        assert!(config.code_lens);
        assert!(config.excluded_paths.contains(&"node_modules".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_keep_missing_fields() {
        let base = ServerConfig {
            indent_width: 4,
            ..Default::default()
        };
        let config = base.with_overrides(&json!({"dialect": "mysql"})).unwrap();

        assert_eq!(config.dialect, SqlDialect::MySql);
        assert_eq!(config.indent_width, 4);
    }

    #[test]
    fn test_validate_rejects_indent_width() {
        for width in [0, 17] {
            let result = ServerConfig::default().with_overrides(&json!({"indentWidth": width}));
            assert!(matches!(result, Err(ConfigError::InvalidIndentWidth(w)) if w == width));
        }
    }

    #[test]
    fn test_wrong_shapes() {
        assert!(matches!(
            ServerConfig::default().with_overrides(&json!(["mysql"])),
            Err(ConfigError::NotAnObject)
        ));
        assert!(matches!(
            ServerConfig::default().with_overrides(&json!({"dialect": "oracle"})),
            Err(ConfigError::Settings(_))
        ));
    }

    #[test]
    fn test_format_options() {
        let config = ServerConfig {
            dialect: SqlDialect::PostgreSql,
            use_tabs: true,
            ..Default::default()
        };
        let options = config.format_options();
        assert_eq!(options.dialect, SqlDialect::PostgreSql);
        assert_eq!(options.indent, IndentStyle::Tabs);
    }

    #[test]
    fn test_settings_section() {
        let settings = json!({"jsonSql": {"codeLens": false}, "other": 1});
        assert_eq!(
            ServerConfig::settings_section(&settings),
            Some(&json!({"codeLens": false}))
        );
        assert_eq!(ServerConfig::settings_section(&json!({"jsonSql": null})), None);
    }
}
