//! Общий модуль для обоих бинарников: логирование и вывод в терминал

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub mod output;

pub use output::{table_lines, OutputFormat, ReportWriter};

/// Where log records may go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Interactive CLI: stderr with colors
    Terminal,
    /// Language server: stderr, no ANSI; stdout carries JSON-RPC
    Lsp,
}

/// Инициализирует tracing; `RUST_LOG` дополняет уровень из `-v`
pub fn init_logging(target: LogTarget, verbose: bool) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(target == LogTarget::Terminal);

    let installed = match target {
        LogTarget::Terminal => builder.with_target(false).try_init(),
        LogTarget::Lsp => builder.try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

/// Outcome class of a CLI message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Info,
    Warning,
    Error,
}

impl Status {
    fn label(self) -> colored::ColoredString {
        match self {
            Status::Ok => "ok".green().bold(),
            Status::Info => "info".blue().bold(),
            Status::Warning => "warning".yellow().bold(),
            Status::Error => "error".red().bold(),
        }
    }
}

/// Печатает итоговое сообщение; ошибки идут в stderr
pub fn print_status(status: Status, message: &str) {
    match status {
        Status::Error => eprintln!("{}: {}", status.label(), message),
        _ => println!("{}: {}", status.label(), message),
    }
}

/// Banner shown when a simulation starts
pub fn print_banner(tool: &str, run: u32, file: &Path) {
    println!("{} {} {}", tool.bold().blue(), format!("#{run}").dimmed(), file.display());
}

/// The CLI only runs tools on existing files; a non-`.tck` name is allowed
/// but noted.
pub fn ensure_model_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("Model file does not exist: {}", path.display());
    }
    if !crate::core::is_tck_path(path) {
        tracing::warn!("{} does not have the .tck extension", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("model.tck");
        assert!(ensure_model_file(&file).is_err());

        std::fs::write(&file, "system:s\n").unwrap();
        assert!(ensure_model_file(&file).is_ok());

        let other = dir.path().join("model.txt");
        std::fs::write(&other, "system:s\n").unwrap();
        assert!(ensure_model_file(&other).is_ok());

        assert!(ensure_model_file(dir.path()).is_err());
    }
}
