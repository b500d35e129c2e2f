/*!
# Error System

Severity levels, tool diagnostics and the typed errors raised while driving
the external TChecker toolchain.
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::position::Span;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One line of toolchain stderr, placed in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDiagnostic {
    pub span: Span,
    pub message: String,
    pub severity: Severity,
}

impl ToolDiagnostic {
    pub fn new(span: Span, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            span,
            message: message.into(),
            severity,
        }
    }
}

impl fmt::Display for ToolDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.span.start, self.severity, self.message)
    }
}

/// Failure to run an external tool at all
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors of the interactive simulation session
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("tck-simulate is already running... Please close the current execution (by using 'q' in the input box).")]
    AlreadyRunning,

    #[error("no simulation is running")]
    NotRunning,

    #[error("invalid simulation transition: {event} while {from}")]
    InvalidTransition { from: String, event: String },

    #[error(transparent)]
    Tool(#[from] ToolError),
}
