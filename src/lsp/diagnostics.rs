//! Модуль для конвертации диагностик между форматами

use async_trait::async_trait;
use std::path::Path;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range, Url};
use tower_lsp::Client;

use crate::core::{Severity, Span, ToolDiagnostic};
use crate::dispatch::DiagnosticsPublisher;

/// `source` field of every published diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "tchecker";

/// Конвертирует ToolDiagnostic в LSP Diagnostic
pub fn convert_to_lsp_diagnostic(diagnostic: &ToolDiagnostic) -> Diagnostic {
    Diagnostic {
        range: convert_span(&diagnostic.span),
        severity: Some(convert_severity(diagnostic.severity)),
        code: None,
        code_description: None,
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: diagnostic.message.clone(),
        related_information: None,
        tags: None,
        data: None,
    }
}

pub fn convert_span(span: &Span) -> Range {
    Range {
        start: Position { line: span.start.line, character: span.start.column },
        end: Position { line: span.end.line, character: span.end.column },
    }
}

fn convert_severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    }
}

/// Publishes tool diagnostics through `textDocument/publishDiagnostics`
pub struct ClientPublisher {
    client: Client,
}

impl ClientPublisher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DiagnosticsPublisher for ClientPublisher {
    async fn publish(&self, file: &Path, diagnostics: &[ToolDiagnostic]) {
        let Ok(uri) = Url::from_file_path(file) else {
            tracing::warn!("Cannot publish diagnostics for non-absolute path {}", file.display());
            return;
        };
        let diagnostics = diagnostics.iter().map(convert_to_lsp_diagnostic).collect();
        self.client.publish_diagnostics(uri, diagnostics, None).await;
    }
}
