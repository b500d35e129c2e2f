/*!
# Language Server Protocol (LSP) implementation

Bridges editors to the TChecker toolchain: diagnostics from `tck-syntax`,
model checking, the interactive simulation session and the `.tck` authoring
helpers (completion, hover, signature help).
*/

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tower_lsp::{LspService, Server};

pub mod commands;
pub mod completion;
mod diagnostics;
pub mod hover;
pub mod notifications;
mod server;
pub mod signature;
mod simulation;

pub use diagnostics::{convert_span, convert_to_lsp_diagnostic, ClientPublisher, DIAGNOSTIC_SOURCE};
pub use server::TCheckerLanguageServer;
pub use simulation::LspSimulationFrontend;

/// Starts LSP server in stdio mode
pub async fn start_stdio_server(config_file: Option<PathBuf>) -> Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) =
        LspService::new(move |client| TCheckerLanguageServer::with_config_file(client, config_file));

    tracing::info!("TChecker LSP Server starting on stdio...");

    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}

/// Starts LSP server on TCP port; serves the first client that connects.
pub async fn start_tcp_server(port: u16, config_file: Option<PathBuf>) -> Result<()> {
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("Failed to bind LSP server to port {port}"))?;

    tracing::info!("TChecker LSP Server listening on 127.0.0.1:{}", port);

    let (stream, peer) = listener.accept().await.context("Failed to accept LSP client")?;
    tracing::info!("LSP client connected from {}", peer);

    let (read, write) = tokio::io::split(stream);
    let (service, socket) =
        LspService::new(move |client| TCheckerLanguageServer::with_config_file(client, config_file));

    Server::new(read, write, socket).serve(service).await;

    Ok(())
}
