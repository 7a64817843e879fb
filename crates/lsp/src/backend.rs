// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # LSP Backend Implementation
//!
//! The tower-lsp `LanguageServer` for JSON documents with embedded SQL.
//!
//! ## Architecture
//!
//! ```text
//! Client → LSP Backend → Document Store
//!                ↓
//!           DocumentSync ──→ jsonSql/setLanguage
//!                ↓
//!           Commands ──→ workspace/applyEdit
//! ```
//!
//! ## Supported LSP Features
//!
//! - textDocument/didOpen, didChange, didClose
//! - textDocument/codeLens
//! - workspace/executeCommand (`jsonsql.openSqlEditor`, `jsonsql.formatSql`,
//!   `jsonsql.saveSql`)
//! - workspace/didChangeConfiguration

use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, jsonrpc};
use tracing::{debug, error, info, warn};

use crate::commands::{self, ALL_COMMANDS, CommandError, SqlCommand};
use crate::config::{ConfigError, ServerConfig};
use crate::document::{DocumentError, DocumentStore};
use crate::sync::DocumentSync;

/// LSP backend implementation
pub struct LspBackend {
    /// LSP client for notifications and requests
    client: Client,

    /// Open documents
    documents: Arc<DocumentStore>,

    /// Current configuration
    config: Arc<RwLock<ServerConfig>>,

    /// Mode switching and code lenses
    doc_sync: Arc<DocumentSync>,
}

impl LspBackend {
    /// Create a new LSP backend
    pub fn new(client: Client) -> Self {
        let config = Arc::new(RwLock::new(ServerConfig::default()));
        let doc_sync = Arc::new(DocumentSync::new(config.clone()));

        Self {
            client,
            documents: Arc::new(DocumentStore::new()),
            config,
            doc_sync,
        }
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub async fn get_config(&self) -> ServerConfig {
        self.config.read().await.clone()
    }

    pub async fn set_config(&self, config: ServerConfig) {
        info!(
            "Configuration updated: dialect={}, indent={}",
            config.dialect, config.indent_width
        );
        *self.config.write().await = config;
    }

    /// Layer `overrides` on the current configuration
    async fn apply_overrides(&self, overrides: &Value) -> std::result::Result<(), LspError> {
        let config = self.get_config().await.with_overrides(overrides)?;
        self.set_config(config).await;
        Ok(())
    }

    /// Load the workspace file, then the initialization options
    async fn load_initial_config(
        &self,
        root: Option<PathBuf>,
        options: Option<&Value>,
    ) -> std::result::Result<(), LspError> {
        if let Some(root) = root {
            self.set_config(ServerConfig::load_from_workspace(&root)?)
                .await;
        }

        if let Some(section) = options.and_then(ServerConfig::settings_section) {
            self.apply_overrides(section).await?;
        }

        Ok(())
    }

    async fn run_command(
        &self,
        command: SqlCommand,
    ) -> std::result::Result<Option<Value>, LspError> {
        let uri = command.uri().clone();
        let document = self
            .documents
            .get_document(&uri)
            .await
            .ok_or_else(|| CommandError::DocumentNotOpen(uri.clone()))?;
        let options = self.get_config().await.format_options();

        match command {
            SqlCommand::OpenSqlEditor { range, .. } => {
                let result = commands::open_sql_editor(&document, range, &options)?;
                for warning in &result.warnings {
                    self.show_message(warning, MessageType::WARNING).await;
                }
                Ok(Some(serde_json::to_value(result)?))
            }
            SqlCommand::FormatSql { range, .. } => {
                let (edit, outcome) = commands::format_sql(&document, range, &options)?;
                for warning in &outcome.warnings {
                    self.show_message(&warning.to_string(), MessageType::WARNING)
                        .await;
                }
                self.apply_edit(uri, edit).await?;
                Ok(Some(serde_json::json!({ "stage": outcome.stage })))
            }
            SqlCommand::SaveSql { range, sql, .. } => {
                let edit = commands::save_sql(&document, range, &sql)?;
                self.apply_edit(uri, edit).await?;
                Ok(None)
            }
        }
    }

    async fn apply_edit(&self, uri: Url, edit: TextEdit) -> std::result::Result<(), LspError> {
        let response = self
            .client
            .apply_edit(commands::workspace_edit(uri.clone(), edit))
            .await
            .map_err(|e| LspError::Generic(format!("applyEdit failed: {}", e)))?;

        if !response.applied {
            warn!(
                "Client rejected edit for {}: {:?}",
                uri, response.failure_reason
            );
        }
        Ok(())
    }

    /// Log a message to the client
    async fn log_message(&self, message: &str, message_type: MessageType) {
        self.client.log_message(message_type, message).await;
    }

    /// Show a message to the user
    async fn show_message(&self, message: &str, message_type: MessageType) {
        self.client.show_message(message_type, message).await;
    }
}

#[allow(deprecated)]
fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| &folder.uri)
        .or(params.root_uri.as_ref())
        .and_then(|uri| uri.to_file_path().ok())
}

#[tower_lsp::async_trait]
impl LanguageServer for LspBackend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Initializing LSP server");
        info!("Client info: {:?}", params.client_info);

        if let Err(e) = self
            .load_initial_config(workspace_root(&params), params.initialization_options.as_ref())
            .await
        {
            warn!("Ignoring invalid configuration: {}", e);
            self.show_message(&format!("JSON SQL: {}", e), MessageType::WARNING)
                .await;
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),
                code_lens_provider: Some(CodeLensOptions {
                    resolve_provider: Some(false),
                }),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: ALL_COMMANDS.iter().map(|c| c.to_string()).collect(),
                    work_done_progress_options: WorkDoneProgressOptions {
                        work_done_progress: Some(false),
                    },
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: crate::SERVER_NAME.to_string(),
                version: Some(crate::VERSION.to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        info!("LSP server initialized successfully");
        self.log_message("JSON SQL server initialized", MessageType::INFO)
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down LSP server");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let uri = doc.uri.clone();

        info!(
            "Document opened: uri={}, language={}, version={}",
            uri, doc.language_id, doc.version
        );

        if let Err(e) = self
            .documents
            .open_document(uri.clone(), doc.text, doc.version, doc.language_id)
            .await
        {
            error!("Failed to open document: {}", e);
            return;
        }

        if let Err(e) = self
            .doc_sync
            .on_document_open(&self.documents, &self.client, &uri)
            .await
        {
            error!("Mode detection failed on open: {}", e);
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let identifier = params.text_document;
        let uri = identifier.uri.clone();

        debug!(
            "Document changed: uri={}, version={}, changes={}",
            uri,
            identifier.version,
            params.content_changes.len()
        );

        match self
            .documents
            .update_document(&identifier, &params.content_changes)
            .await
        {
            Ok(()) => {
                if let Err(e) = self
                    .doc_sync
                    .on_document_change(&self.documents, &self.client, &uri)
                    .await
                {
                    error!("Mode detection failed on change: {}", e);
                }
            }
            Err(DocumentError::DocumentNotFound(uri)) => {
                warn!("Document not found for change: {}", uri);
            }
            Err(e) => {
                error!("Failed to update document: {}", e);
                self.show_message(
                    &format!("Failed to update document: {}", e),
                    MessageType::ERROR,
                )
                .await;
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        info!("Document closed: uri={}", uri);

        if !self.documents.close_document(&uri).await {
            warn!("Document not found for close: {}", uri);
        }
    }

    async fn code_lens(&self, params: CodeLensParams) -> Result<Option<Vec<CodeLens>>> {
        let uri = params.text_document.uri;

        let Some(document) = self.documents.get_document(&uri).await else {
            warn!("Document not found for code lens: {}", uri);
            return Ok(None);
        };

        let lenses = self.doc_sync.code_lenses(&document).await;
        debug!("{} code lenses for {}", lenses.len(), uri);
        Ok(Some(lenses))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        info!("Execute command: {}", params.command);

        let command = SqlCommand::parse(&params.command, &params.arguments)?;
        self.run_command(command).await.map_err(|e| {
            error!("Command {} failed: {}", params.command, e);
            jsonrpc::Error::from(e)
        })
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        debug!("Configuration changed: {:?}", params.settings);

        let Some(section) = ServerConfig::settings_section(&params.settings) else {
            return;
        };

        if let Err(e) = self.apply_overrides(section).await {
            warn!("Ignoring invalid configuration: {}", e);
            self.show_message(&format!("JSON SQL: {}", e), MessageType::WARNING)
                .await;
        }
    }
}

/// LSP backend errors
#[derive(Debug, thiserror::Error)]
pub enum LspError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Document error
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Command error
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Result serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("LSP error: {0}")]
    Generic(String),
}

impl From<LspError> for jsonrpc::Error {
    fn from(error: LspError) -> Self {
        match error {
            LspError::Command(e) => e.into(),
            other => {
                let mut rpc = jsonrpc::Error::internal_error();
                rpc.message = other.to_string().into();
                rpc
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_errors_stay_invalid_params() {
        let error: jsonrpc::Error =
            LspError::Command(CommandError::UnknownCommand("x".to_string())).into();
        assert_eq!(error.code, jsonrpc::ErrorCode::InvalidParams);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let error: jsonrpc::Error = LspError::Generic("boom".to_string()).into();
        assert_eq!(error.code, jsonrpc::ErrorCode::InternalError);
        assert_eq!(error.message, "LSP error: boom");
    }

    #[test]
    #[allow(deprecated)]
    fn test_workspace_root_prefers_folders() {
        let params = InitializeParams {
            root_uri: Some(Url::parse("file:///root").unwrap()),
            workspace_folders: Some(vec![WorkspaceFolder {
                uri: Url::parse("file:///folder").unwrap(),
                name: "folder".to_string(),
            }]),
            ..Default::default()
        };
        assert_eq!(workspace_root(&params), Some(PathBuf::from("/folder")));

        let params = InitializeParams {
            root_uri: Some(Url::parse("file:///root").unwrap()),
            ..Default::default()
        };
        assert_eq!(workspace_root(&params), Some(PathBuf::from("/root")));
    }
}
