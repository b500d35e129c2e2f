// Диагностика: коллекция результатов последнего запуска инструментов
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::{Severity, ToolDiagnostic};

/// Diagnostics of the last tool run, keyed by file.
///
/// Every dispatcher clears the collection before publishing, so results of
/// an earlier run never sit next to fresh ones.
#[derive(Debug, Default)]
pub struct DiagnosticCollection {
    entries: HashMap<PathBuf, Vec<ToolDiagnostic>>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes everything; returns the files that had diagnostics so the
    /// caller can publish empty sets for them.
    pub fn clear(&mut self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self.entries.drain().map(|(path, _)| path).collect();
        files.sort();
        files
    }

    pub fn set(&mut self, file: impl Into<PathBuf>, diagnostics: Vec<ToolDiagnostic>) {
        let file = file.into();
        if diagnostics.is_empty() {
            self.entries.remove(&file);
        } else {
            self.entries.insert(file, diagnostics);
        }
    }

    pub fn get(&self, file: &Path) -> &[ToolDiagnostic] {
        self.entries.get(file).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of diagnostics across files
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .values()
            .flatten()
            .filter(|d| d.severity == severity)
            .count()
    }
}
