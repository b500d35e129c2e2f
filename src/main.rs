/*!
# TChecker LSP CLI

Command-line front end over the same dispatchers the language server uses.
*/

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex, Notify};

use tchecker_lsp::cli_common::{self, LogTarget, OutputFormat, ReportWriter, Status};
use tchecker_lsp::core::{read_tck_file, Position};
use tchecker_lsp::toolchain::simulation::{EXECUTION_MESSAGE, INPUT_BOX_PLACEHOLDER};
use tchecker_lsp::{
    lsp, DiagnosticsPublisher, Dispatcher, ModelCheckMode, NullPublisher, SimulationFrontend,
    SimulationOutput, Simulator, SyntaxOutcome, ToolDiagnostic, ToolchainConfig, KEYWORDS,
};

#[derive(Parser)]
#[command(
    name = "tchecker-lsp",
    version = env!("CARGO_PKG_VERSION"),
    about = "Language server and command-line bridge to the TChecker toolchain"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Toolchain configuration file (replaces the workspace tchecker.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start Language Server Protocol (LSP) server
    Lsp {
        /// LSP server port (stdio if not specified)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check the syntax of a .tck file with tck-syntax
    Check {
        file: PathBuf,

        /// Output format (text, json)
        #[arg(short = 'f', long, default_value = "text")]
        format: OutputFormat,
    },

    /// Run reachability or liveness checking
    ModelCheck {
        file: PathBuf,

        /// reach or liveness
        #[arg(short, long, default_value = "reach")]
        mode: ModelCheckMode,

        /// Output format (text, json)
        #[arg(short = 'f', long, default_value = "text")]
        format: OutputFormat,
    },

    /// Interactive simulation in the terminal
    Simulate { file: PathBuf },

    /// List the declaration keywords of the .tck format
    Keywords,

    /// Print the effective toolchain configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_target = match cli.command {
        Commands::Lsp { .. } => LogTarget::Lsp,
        _ => LogTarget::Terminal,
    };
    cli_common::init_logging(log_target, cli.verbose)?;

    match cli.command {
        Commands::Lsp { port } => lsp_command(port, cli.config).await?,

        Commands::Check { file, format } => {
            let config = load_config(cli.config.as_deref())?;
            let failed = check_command(&config, &file, format).await?;
            if failed {
                std::process::exit(1);
            }
        }

        Commands::ModelCheck { file, mode, format } => {
            let config = load_config(cli.config.as_deref())?;
            let success = model_check_command(&config, &file, mode, format).await?;
            if !success {
                std::process::exit(1);
            }
        }

        Commands::Simulate { file } => {
            let config = load_config(cli.config.as_deref())?;
            simulate_command(&config, &file).await?;
        }

        Commands::Keywords => keywords_command()?,

        Commands::Config => {
            let config = load_config(cli.config.as_deref())?;
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<ToolchainConfig> {
    let workspace = std::env::current_dir().context("Failed to determine current directory")?;
    ToolchainConfig::load(explicit, Some(&workspace))
}

async fn lsp_command(port: Option<u16>, config_file: Option<PathBuf>) -> Result<()> {
    match port {
        Some(port) => lsp::start_tcp_server(port, config_file).await,
        None => lsp::start_stdio_server(config_file).await,
    }
}

/// Prints diagnostics as they are published
struct TerminalPublisher;

#[async_trait]
impl DiagnosticsPublisher for TerminalPublisher {
    async fn publish(&self, file: &Path, diagnostics: &[ToolDiagnostic]) {
        if diagnostics.is_empty() {
            return;
        }
        let source = read_tck_file(file).ok();
        for diagnostic in diagnostics {
            print_diagnostic(file, source.as_deref(), diagnostic);
        }
    }
}

fn print_diagnostic(file: &Path, source: Option<&str>, diagnostic: &ToolDiagnostic) {
    let severity = match diagnostic.severity {
        tchecker_lsp::Severity::Error => "error".red().bold(),
        tchecker_lsp::Severity::Warning => "warning".yellow().bold(),
    };
    println!(
        "{}:{}: {}: {}",
        file.display(),
        diagnostic.span.start,
        severity,
        diagnostic.message
    );

    let Position { line, column } = diagnostic.span.start;
    if diagnostic.span.is_zero() {
        return;
    }
    if let Some(text) = source.and_then(|s| tchecker_lsp::core::position::line_at(s, line)) {
        println!("  {} {}", "|".blue(), text);
        println!("  {} {}{}", "|".blue(), " ".repeat(column as usize), "^".green());
    }
}

async fn check_command(config: &ToolchainConfig, file: &Path, format: OutputFormat) -> Result<bool> {
    cli_common::ensure_model_file(file)?;
    let dispatcher = Dispatcher::new();

    let outcome = match format {
        OutputFormat::Text => dispatcher.syntax_check(config, file, &TerminalPublisher).await?,
        OutputFormat::Json => dispatcher.syntax_check(config, file, &NullPublisher).await?,
    };

    match format {
        OutputFormat::Text => {
            let status = match outcome {
                SyntaxOutcome::Failed(_) => Status::Error,
                SyntaxOutcome::Warnings(_) => Status::Warning,
                SyntaxOutcome::Clean => Status::Ok,
            };
            cli_common::print_status(status, outcome.message());
        }
        OutputFormat::Json => {
            let mut writer = ReportWriter::stdout(format);
            writer.json(&serde_json::json!({
                "file": file.display().to_string(),
                "status": outcome.status(),
                "message": outcome.message(),
                "diagnostics": outcome.diagnostics(),
            }))?;
            writer.finish()?;
        }
    }

    Ok(outcome.is_failure())
}

async fn model_check_command(
    config: &ToolchainConfig,
    file: &Path,
    mode: ModelCheckMode,
    format: OutputFormat,
) -> Result<bool> {
    cli_common::ensure_model_file(file)?;
    let dispatcher = Dispatcher::new();

    match format {
        OutputFormat::Text => {
            let report = dispatcher.model_check(config, mode, file, &TerminalPublisher).await?;
            let mut writer = ReportWriter::stdout(format);
            writer.heading(&format!("{} on {}", mode.tool(), file.display()))?;
            for (key, value) in &report.stats {
                writer.line(&format!("{} {}", key.bold(), value))?;
            }
            writer.finish()?;
            let status = if report.success { Status::Info } else { Status::Error };
            cli_common::print_status(status, &report.summary());
            Ok(report.success)
        }
        OutputFormat::Json => {
            let report = dispatcher.model_check(config, mode, file, &NullPublisher).await?;
            let mut writer = ReportWriter::stdout(format);
            writer.json(&report)?;
            writer.finish()?;
            Ok(report.success)
        }
    }
}

/// Simulation frontend printing to the terminal
#[derive(Default)]
struct TerminalFrontend {
    closed: Notify,
    exit_code: Mutex<Option<i32>>,
}

#[async_trait]
impl SimulationFrontend for TerminalFrontend {
    async fn session_started(&self, run: u32, file: &Path) {
        cli_common::print_banner("tck-simulate", run, file);
        println!("{}", EXECUTION_MESSAGE.dimmed());
    }

    async fn output(&self, _run: u32, output: SimulationOutput) {
        match output {
            SimulationOutput::Stdout(_) => println!("{}", output.render()),
            SimulationOutput::Stderr(_) => eprintln!("{}", output.render().red()),
        }
    }

    async fn request_input(&self, _run: u32) {
        tracing::debug!("{}", INPUT_BOX_PLACEHOLDER);
    }

    async fn session_closed(&self, run: u32, exit_code: Option<i32>) {
        *self.exit_code.lock().await = exit_code;
        tracing::info!(run, ?exit_code, "Simulation finished");
        self.closed.notify_one();
    }
}

async fn simulate_command(config: &ToolchainConfig, file: &Path) -> Result<()> {
    cli_common::ensure_model_file(file)?;
    let frontend = Arc::new(TerminalFrontend::default());
    let simulator = Simulator::new();
    simulator.launch(config, file, frontend.clone()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = frontend.closed.notified() => break,
            line = lines.next_line(), if stdin_open => {
                let line = match line.context("Failed to read standard input")? {
                    Some(line) => line,
                    None => {
                        // end of input quits the simulator
                        stdin_open = false;
                        "q".to_string()
                    }
                };
                if let Err(e) = simulator.submit(line).await {
                    tracing::debug!("Input dropped: {}", e);
                }
            }
        }
    }

    match *frontend.exit_code.lock().await {
        Some(0) => cli_common::print_status(Status::Ok, "Simulation finished"),
        Some(code) => cli_common::print_status(Status::Warning, &format!("Simulation exited with code {code}")),
        None => cli_common::print_status(Status::Warning, "Simulation terminated by a signal"),
    }
    Ok(())
}

fn keywords_command() -> Result<()> {
    let mut writer = ReportWriter::stdout(OutputFormat::Text);
    writer.heading("TChecker declarations")?;
    let rows: Vec<Vec<String>> = KEYWORDS
        .iter()
        .map(|k| vec![k.name.to_string(), k.signature.to_string(), k.title()])
        .collect();
    writer.table(&["Keyword", "Signature", "Title"], &rows)?;
    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_model_check() {
        let cli = Cli::try_parse_from(["tchecker-lsp", "-v", "model-check", "m.tck", "--mode", "liveness"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::ModelCheck { file, mode, format } => {
                assert_eq!(file, PathBuf::from("m.tck"));
                assert_eq!(mode, ModelCheckMode::Liveness);
                assert_eq!(format, OutputFormat::Text);
            }
            _ => panic!("expected model-check"),
        }
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["tchecker-lsp", "check", "m.tck", "--format", "sarif"]).is_err());
    }
}
