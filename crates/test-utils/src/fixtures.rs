// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test fixtures: JSON documents with and without embedded SQL

/// Sample JSON documents for testing
pub struct JsonFixtures;

impl JsonFixtures {
    // ===== Documents with embedded SQL =====

    /// Query catalog with one uppercase query per entry
    pub const fn query_catalog() -> &'static str {
        r#"{
  "queries": [
    {
      "name": "active_users",
      "sql": "SELECT id, name FROM users WHERE active = 1 ORDER BY name"
    },
    {
      "name": "orders_for_user",
      "sql": "SELECT o.id, o.total FROM orders o WHERE o.user_id = {userId}#1"
    }
  ]
}"#
    }

    /// Config file whose SQL uses CRLF line endings
    pub const fn crlf_document() -> &'static str {
        "{\r\n  \"filter\": \"ORDERS.STATUS = 'open'\",\r\n  \"query\": \"SELECT * FROM ORDERS WHERE STATUS IN (1, 2)\"\r\n}"
    }

    /// Query with template variables in both delimiter styles
    pub const fn templated_query() -> &'static str {
        "SELECT * FROM t WHERE id = {userId}#1 AND region = <region> AND name = 'Bob''s {car}'"
    }

    // ===== Documents without embedded SQL =====

    /// Ordinary application config
    pub const fn plain_config() -> &'static str {
        r#"{
  "name": "widget-service",
  "port": 8080,
  "features": ["search", "export"],
  "owner": "platform team"
}"#
    }

    /// SQL keywords inside values that mention a prose field
    pub const fn described_query() -> &'static str {
        r#"{"doc": "{\"description\": \"SELECT FROM WHERE CREATE\"}", "note": "SELECT FROM WHERE CREATE description"}"#
    }

    /// Hand-written lowercase query
    pub const fn lowercase_query() -> &'static str {
        r#"{"sql": "select * from table where x"}"#
    }

    // ===== Threshold boundary =====

    /// Exactly `hits` uppercase keyword hits spread over separate values
    pub fn keyword_hits(hits: usize) -> String {
        let values: Vec<String> = (0..hits)
            .map(|i| format!("\"v{i}\": \"column_{i} AND other\""))
            .collect();
        format!("{{{}}}", values.join(", "))
    }

    /// Document text for a single JSON object with one `key: value` per line
    pub fn lines_document(pairs: &[(&str, &str)]) -> String {
        let body: Vec<String> = pairs
            .iter()
            .map(|(key, value)| {
                format!(
                    "  {}: {}",
                    serde_json::Value::String(key.to_string()),
                    serde_json::Value::String(value.to_string())
                )
            })
            .collect();
        format!("{{\n{}\n}}", body.join(",\n"))
    }
}
