//! Launching toolchain processes.
//!
//! Every tool is invoked as `<path><command> <file>` through the platform
//! shell, so configured commands may carry their own flags. The file is
//! passed as one positional argument and never re-split by the shell.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::config::{Tool, ToolchainConfig};
use crate::core::ToolError;

/// Captured result of a one-shot tool run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Human-readable command line, used in logs and errors
pub fn display_command(config: &ToolchainConfig, tool: Tool, file: &Path) -> String {
    format!("{} {}", config.command_for(tool), file.display())
}

/// Builds the shell invocation of `command_line` on `file`.
pub fn shell_command(command_line: &str, file: &Path) -> Command {
    #[cfg(unix)]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(format!("{command_line} \"$1\""))
            .arg("tchecker-lsp")
            .arg(file);
        cmd
    }

    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C")
            .arg(format!("{command_line} \"{}\"", file.display()));
        cmd
    }
}

/// Runs `tool` on `file` and waits for it to exit. There is no timeout.
pub async fn run_once(config: &ToolchainConfig, tool: Tool, file: &Path) -> Result<ToolOutput, ToolError> {
    let command = display_command(config, tool, file);
    tracing::info!(%tool, "Running `{}`", command);

    let output = shell_command(&config.command_for(tool), file)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| ToolError::Spawn { command: command.clone(), source })?;

    let result = ToolOutput {
        status: output.status.code(),
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    tracing::debug!(
        %tool,
        status = ?result.status,
        stdout_bytes = result.stdout.len(),
        stderr_bytes = result.stderr.len(),
        "`{}` finished",
        command
    );

    Ok(result)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn config_with(command: &str) -> ToolchainConfig {
        ToolchainConfig {
            syntax_command: command.to_string(),
            ..ToolchainConfig::default()
        }
    }

    #[tokio::test]
    async fn test_file_is_passed_as_single_argument() {
        let config = config_with("printf '%s|'");
        let output = run_once(&config, Tool::Syntax, Path::new("/tmp/my model.tck")).await.unwrap();
        assert!(output.success);
        assert_eq!(output.stdout, "/tmp/my model.tck|");
    }

    #[tokio::test]
    async fn test_exit_status_and_stderr_are_captured() {
        let config = config_with("sh -c 'echo \"1.2: bad\" >&2; exit 3' --");
        let output = run_once(&config, Tool::Syntax, Path::new("m.tck")).await.unwrap();
        assert!(!output.success);
        assert_eq!(output.status, Some(3));
        assert_eq!(output.stderr, "1.2: bad\n");
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_failed_run_not_a_panic() {
        let mut config = config_with("tck-syntax-does-not-exist");
        config.path = "/nonexistent/".to_string();
        let output = run_once(&config, Tool::Syntax, Path::new("m.tck")).await.unwrap();
        assert!(!output.success);
        assert!(!output.stderr.is_empty());
    }

    #[test]
    fn test_display_command() {
        let config = ToolchainConfig { path: "/bin/".into(), ..ToolchainConfig::default() };
        assert_eq!(
            display_command(&config, Tool::Reach, Path::new("a.tck")),
            "/bin/tck-reach -a reach a.tck"
        );
    }
}
