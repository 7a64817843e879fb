// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use jsonsql_lsp::LspBackend;
use tower_lsp::{LspService, Server};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol; logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!("Starting {} {}", jsonsql_lsp::SERVER_NAME, jsonsql_lsp::VERSION);

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(LspBackend::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
