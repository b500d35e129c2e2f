/// LSP Server main entry point
///
/// Launches the TChecker Language Server over stdio, for editors that expect
/// a dedicated server binary.
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tchecker_lsp::{cli_common, lsp};

#[derive(Parser, Debug)]
#[command(
    name = "tchecker-lsp-server",
    version = env!("CARGO_PKG_VERSION"),
    about = "TChecker Language Server over stdio"
)]
struct ServerArgs {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Toolchain configuration file (replaces the workspace tchecker.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();

    // stdout belongs to the protocol, logs go to stderr
    cli_common::init_logging(cli_common::LogTarget::Lsp, args.verbose)?;

    tracing::info!("Starting TChecker Language Server via stdio...");

    lsp::start_stdio_server(args.config).await?;

    Ok(())
}
