// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Configuration layering tests

use jsonsql_core::{IndentStyle, SqlDialect};
use jsonsql_lsp::{ConfigError, ServerConfig};
use serde_json::json;
use std::path::Path;

#[test]
fn test_yaml_file_body() {
    let config = ServerConfig::from_yaml_str(
        "dialect: postgres\nindentWidth: 4\nexcludedPaths:\n  - fixtures\ncodeLens: false\n",
    )
    .unwrap();

    assert_eq!(config.dialect, SqlDialect::PostgreSql);
    assert_eq!(config.indent_width, 4);
    assert_eq!(config.excluded_paths, vec!["fixtures".to_string()]);
    assert!(!config.code_lens);
    assert_eq!(config.format_options().indent, IndentStyle::Spaces(4));
}

#[test]
fn test_empty_yaml_is_default() {
    assert_eq!(ServerConfig::from_yaml_str("").unwrap(), ServerConfig::default());
}

#[test]
fn test_malformed_yaml() {
    assert!(matches!(
        ServerConfig::from_yaml_str("dialect: [unclosed"),
        Err(ConfigError::Yaml(_))
    ));
}

#[test]
fn test_invalid_yaml_values_are_validated() {
    assert!(matches!(
        ServerConfig::from_yaml_str("indentWidth: 0"),
        Err(ConfigError::InvalidIndentWidth(0))
    ));
}

#[test]
fn test_sources_layer_in_order() {
    let from_file = ServerConfig::from_yaml_str("dialect: mysql\nindentWidth: 4").unwrap();

    let init_options = json!({"jsonSql": {"indentWidth": 8}});
    let section = ServerConfig::settings_section(&init_options).unwrap();
    let initialized = from_file.with_overrides(section).unwrap();

    let changed = json!({"jsonSql": {"useTabs": true}});
    let section = ServerConfig::settings_section(&changed).unwrap();
    let current = initialized.with_overrides(section).unwrap();

    assert_eq!(current.dialect, SqlDialect::MySql);
    assert_eq!(current.indent_width, 8);
    assert!(current.use_tabs);
    assert_eq!(current.format_options().indent, IndentStyle::Tabs);
}

#[test]
fn test_missing_workspace_file_uses_defaults() {
    let root = Path::new("/nonexistent/jsonsql/workspace");
    assert_eq!(
        ServerConfig::load_from_workspace(root).unwrap(),
        ServerConfig::default()
    );
}

#[test]
fn test_file_filter_uses_excluded_paths() {
    let config = ServerConfig {
        excluded_paths: vec!["generated".to_string()],
        ..Default::default()
    };
    let filter = config.file_filter();

    assert!(filter.should_process("/work/package.json", "json"));
    assert!(!filter.should_process("/work/generated/q.json", "json"));
}
