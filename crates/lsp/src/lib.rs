// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # JSON SQL LSP - Language Server Protocol
//!
//! LSP server that finds SQL queries embedded in JSON string values and
//! helps edit them.
//!
//! ## Overview
//!
//! The server provides:
//! - Relabelling of `.json` documents as `sql-in-json` while they carry SQL
//! - An "Open in SQL Editor" code lens on every line holding a query
//! - Commands to read, format and write back an embedded query
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Client (VS Code, etc.)          │
//! └──────────────┬──────────────────────────┘
//!                │ LSP Protocol
//!                ↓
//! ┌─────────────────────────────────────────┐
//! │         LSP Backend (tower-lsp)         │
//! ├─────────────────────────────────────────┤
//! │  • did_open / did_change / did_close    │
//! │  • code_lens / execute_command          │
//! └──────────────┬──────────────────────────┘
//!                │
//!         ┌──────┴──────┬────────────────┐
//!         ↓             ↓                ↓
//! ┌────────────┐ ┌──────────┐  ┌──────────────┐
//! │   Config   │ │ Document │  │ jsonsql-core │
//! │            │ │   Store  │  │ detect/format│
//! └────────────┘ └──────────┘  └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use jsonsql_lsp::LspBackend;
//! use tower_lsp::{LspService, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let stdin = tokio::io::stdin();
//!     let stdout = tokio::io::stdout();
//!
//!     let (service, socket) = LspService::new(LspBackend::new);
//!     Server::new(stdin, stdout, socket).serve(service).await;
//! }
//! ```
//!
//! ### Configuration
//!
//! Client settings:
//! ```json
//! {
//!   "jsonSql": {
//!     "dialect": "postgresql",
//!     "indentWidth": 4,
//!     "excludedPaths": ["node_modules", "fixtures"]
//!   }
//! }
//! ```
//!
//! The same keys are read from `.jsonsql.yaml` at the workspace root.
//!
//! ## Modules
//!
//! - [`backend`]: Main LSP server implementation
//! - [`commands`]: `workspace/executeCommand` handlers
//! - [`config`]: Server configuration and validation
//! - [`document`]: Document management and storage
//! - [`sync`]: Mode switching and code lenses

pub mod backend;
pub mod commands;
pub mod config;
pub mod document;
pub mod sync;

// Re-exports for convenience
pub use backend::{LspBackend, LspError};
pub use commands::{CommandError, OpenSqlResult, SqlCommand};
pub use config::{ConfigError, ServerConfig};
pub use document::{Document, DocumentError, DocumentMetadata, DocumentStore};
pub use sync::{DocumentSync, ModeSwitch, SetLanguage, SetLanguageParams};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name
pub const SERVER_NAME: &str = "jsonsql-lsp";
