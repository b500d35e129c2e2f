//! `tck-syntax` dispatcher.

use std::path::Path;

use super::runner::{run_once, ToolOutput};
use super::translator::translate;
use crate::config::{Tool, ToolchainConfig};
use crate::core::{Severity, ToolDiagnostic, ToolError};

pub const SYNTAX_ERROR_MESSAGE: &str =
    "An error has occurred. Please check the 'Problems' panel for more details.";
pub const SYNTAX_WARNING_MESSAGE: &str =
    "Syntax OK. Warning(s) detected, please check the 'Problems' panel for more details.";
pub const SYNTAX_OK_MESSAGE: &str = "Syntax OK.";

/// Result of one syntax check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxOutcome {
    /// Non-zero exit; stderr translated at error severity
    Failed(Vec<ToolDiagnostic>),
    /// Zero exit with stderr output; translated at warning severity
    Warnings(Vec<ToolDiagnostic>),
    Clean,
}

impl SyntaxOutcome {
    pub fn from_output(output: &ToolOutput) -> Self {
        if !output.success {
            SyntaxOutcome::Failed(translate(&output.stderr, Severity::Error))
        } else if !output.stderr.is_empty() {
            SyntaxOutcome::Warnings(translate(&output.stderr, Severity::Warning))
        } else {
            SyntaxOutcome::Clean
        }
    }

    pub fn diagnostics(&self) -> &[ToolDiagnostic] {
        match self {
            SyntaxOutcome::Failed(diags) | SyntaxOutcome::Warnings(diags) => diags,
            SyntaxOutcome::Clean => &[],
        }
    }

    /// Notification shown to the user for this outcome
    pub fn message(&self) -> &'static str {
        match self {
            SyntaxOutcome::Failed(_) => SYNTAX_ERROR_MESSAGE,
            SyntaxOutcome::Warnings(_) => SYNTAX_WARNING_MESSAGE,
            SyntaxOutcome::Clean => SYNTAX_OK_MESSAGE,
        }
    }

    /// Short machine-readable label
    pub fn status(&self) -> &'static str {
        match self {
            SyntaxOutcome::Failed(_) => "failed",
            SyntaxOutcome::Warnings(_) => "warnings",
            SyntaxOutcome::Clean => "clean",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SyntaxOutcome::Failed(_))
    }
}

/// Runs the configured syntax checker on `file` and classifies its output.
pub async fn run_syntax_check(config: &ToolchainConfig, file: &Path) -> Result<SyntaxOutcome, ToolError> {
    let output = run_once(config, Tool::Syntax, file).await?;
    let outcome = SyntaxOutcome::from_output(&output);
    tracing::info!(
        file = %file.display(),
        diagnostics = outcome.diagnostics().len(),
        failed = outcome.is_failure(),
        "Syntax check finished"
    );
    Ok(outcome)
}
