/*!
# Command dispatch

Binds the one-shot commands (syntax check, model checking) to the shared
diagnostics collection. The collection is cleared and the cleared files are
re-published empty before the tool runs; the fresh results are recorded and
published once it exits.

Frontends plug in through [`DiagnosticsPublisher`]: the language server
forwards to `textDocument/publishDiagnostics`, the CLI prints.
*/

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::ToolchainConfig;
use crate::core::{Severity, ToolDiagnostic, ToolError};
use crate::diagnostics::DiagnosticCollection;
use crate::toolchain::{run_model_check, run_syntax_check, ModelCheckMode, ModelCheckReport, SyntaxOutcome};

/// Receives the diagnostics of one file (an empty slice clears it)
#[async_trait]
pub trait DiagnosticsPublisher: Send + Sync {
    async fn publish(&self, file: &Path, diagnostics: &[ToolDiagnostic]);
}

/// Publisher that drops everything
pub struct NullPublisher;

#[async_trait]
impl DiagnosticsPublisher for NullPublisher {
    async fn publish(&self, _file: &Path, _diagnostics: &[ToolDiagnostic]) {}
}

/// Owner of the diagnostics collection
#[derive(Clone, Default)]
pub struct Dispatcher {
    diagnostics: Arc<Mutex<DiagnosticCollection>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every file and publishes the empty sets.
    pub async fn clear(&self, publisher: &dyn DiagnosticsPublisher) {
        let cleared = self.diagnostics.lock().await.clear();
        for file in cleared {
            publisher.publish(&file, &[]).await;
        }
    }

    /// Drops the diagnostics of one file (e.g. when its document is closed).
    pub async fn forget(&self, file: &Path) -> bool {
        let mut diagnostics = self.diagnostics.lock().await;
        let had_any = !diagnostics.get(file).is_empty();
        diagnostics.set(file, Vec::new());
        had_any
    }

    pub async fn syntax_check(
        &self,
        config: &ToolchainConfig,
        file: &Path,
        publisher: &dyn DiagnosticsPublisher,
    ) -> Result<SyntaxOutcome, ToolError> {
        self.clear(publisher).await;
        let outcome = run_syntax_check(config, file).await?;
        self.record(file, outcome.diagnostics().to_vec(), publisher).await;
        Ok(outcome)
    }

    pub async fn model_check(
        &self,
        config: &ToolchainConfig,
        mode: ModelCheckMode,
        file: &Path,
        publisher: &dyn DiagnosticsPublisher,
    ) -> Result<ModelCheckReport, ToolError> {
        self.clear(publisher).await;
        let report = run_model_check(config, mode, file).await?;
        self.record(file, report.diagnostics.clone(), publisher).await;
        Ok(report)
    }

    /// Diagnostics currently recorded for `file`
    pub async fn diagnostics_for(&self, file: &Path) -> Vec<ToolDiagnostic> {
        self.diagnostics.lock().await.get(file).to_vec()
    }

    /// Number of recorded diagnostics across all files
    pub async fn total(&self) -> usize {
        self.diagnostics.lock().await.len()
    }

    pub async fn count(&self, severity: Severity) -> usize {
        self.diagnostics.lock().await.count(severity)
    }

    async fn record(
        &self,
        file: &Path,
        diagnostics: Vec<ToolDiagnostic>,
        publisher: &dyn DiagnosticsPublisher,
    ) {
        let file: PathBuf = file.to_path_buf();
        self.diagnostics.lock().await.set(file.clone(), diagnostics.clone());
        if !diagnostics.is_empty() {
            publisher.publish(&file, &diagnostics).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Span;

    #[tokio::test]
    async fn test_forget() {
        let dispatcher = Dispatcher::new();
        let file = Path::new("/m/a.tck");
        dispatcher
            .record(file, vec![ToolDiagnostic::new(Span::zero(), "x", Severity::Error)], &NullPublisher)
            .await;
        assert_eq!(dispatcher.total().await, 1);
        assert!(dispatcher.forget(file).await);
        assert!(!dispatcher.forget(file).await);
        assert_eq!(dispatcher.total().await, 0);
    }
}
