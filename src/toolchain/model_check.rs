//! Reachability and liveness launcher (`tck-reach`, `tck-liveness`).
//!
//! Both tools print their results as `KEY value` lines on stdout, e.g.
//! `REACHABLE false` or `CYCLE true`, followed by statistics.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::runner::{run_once, ToolOutput};
use super::translator::translate;
use crate::config::{Tool, ToolchainConfig};
use crate::core::{Severity, ToolDiagnostic, ToolError};

static STAT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][A-Z0-9_]*)\s+(.+)$").expect("stat line regex is valid"));

/// Which property is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelCheckMode {
    Reach,
    Liveness,
}

impl ModelCheckMode {
    pub fn tool(self) -> Tool {
        match self {
            ModelCheckMode::Reach => Tool::Reach,
            ModelCheckMode::Liveness => Tool::Liveness,
        }
    }

    /// Statistic key carrying the verdict
    fn verdict_key(self) -> &'static str {
        match self {
            ModelCheckMode::Reach => "REACHABLE",
            ModelCheckMode::Liveness => "CYCLE",
        }
    }
}

impl fmt::Display for ModelCheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelCheckMode::Reach => write!(f, "reach"),
            ModelCheckMode::Liveness => write!(f, "liveness"),
        }
    }
}

impl FromStr for ModelCheckMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reach" | "reachability" => Ok(ModelCheckMode::Reach),
            "liveness" => Ok(ModelCheckMode::Liveness),
            other => Err(format!("Unknown model checking mode: {other} (expected reach or liveness)")),
        }
    }
}

/// Parsed output of a reachability/liveness run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelCheckReport {
    pub mode: ModelCheckMode,
    pub success: bool,
    /// `REACHABLE` / `CYCLE` value when the tool printed one
    pub verdict: Option<bool>,
    pub stats: Vec<(String, String)>,
    pub stdout: String,
    pub diagnostics: Vec<ToolDiagnostic>,
}

impl ModelCheckReport {
    pub fn from_output(mode: ModelCheckMode, output: &ToolOutput) -> Self {
        let stats: Vec<(String, String)> = output
            .stdout
            .lines()
            .filter_map(|line| STAT_LINE.captures(line.trim_end()))
            .map(|caps| (caps[1].to_string(), caps[2].trim().to_string()))
            .collect();

        let verdict = stats
            .iter()
            .find(|(key, _)| key == mode.verdict_key())
            .and_then(|(_, value)| match value.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            });

        let severity = if output.success { Severity::Warning } else { Severity::Error };

        Self {
            mode,
            success: output.success,
            verdict,
            stats,
            stdout: output.stdout.clone(),
            diagnostics: translate(&output.stderr, severity),
        }
    }

    /// Looks a statistic up by key
    pub fn stat(&self, key: &str) -> Option<&str> {
        self.stats.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// One-line message for the user
    pub fn summary(&self) -> String {
        let tool = self.mode.tool();
        if !self.success {
            return format!("{tool} failed. Please check the 'Problems' panel for more details.");
        }
        match (self.mode, self.verdict) {
            (ModelCheckMode::Reach, Some(true)) => "Reachable: a state matching the labels was found.".to_string(),
            (ModelCheckMode::Reach, Some(false)) => "Not reachable: no state matches the labels.".to_string(),
            (ModelCheckMode::Liveness, Some(true)) => "Cycle found: an accepting cycle exists.".to_string(),
            (ModelCheckMode::Liveness, Some(false)) => "No accepting cycle found.".to_string(),
            (_, None) => format!("{tool} finished without a verdict."),
        }
    }
}

/// Runs the reachability or liveness tool on `file`.
pub async fn run_model_check(
    config: &ToolchainConfig,
    mode: ModelCheckMode,
    file: &Path,
) -> Result<ModelCheckReport, ToolError> {
    let output = run_once(config, mode.tool(), file).await?;
    let report = ModelCheckReport::from_output(mode, &output);
    tracing::info!(%mode, verdict = ?report.verdict, success = report.success, "Model checking finished");
    Ok(report)
}
