//! Fake toolchain scripts for the integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tchecker_lsp::ToolchainConfig;
use tempfile::TempDir;

pub const MODEL: &str = "\
system:demo
event:tick
process:P
location:P:l0{initial:}
location:P:l1
edge:P:l0:l1:tick
";

/// Workspace with a model file and room for fake tools
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self { dir: TempDir::new().expect("temp dir") }
    }

    pub fn model(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, MODEL).expect("write model");
        path
    }

    /// Writes `body` as a shell script and returns the command running it.
    ///
    /// Scripts go through `sh` so no exec bit is needed.
    pub fn tool(&self, name: &str, body: &str) -> String {
        let path = self.dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        format!("sh {}", quoted(&path))
    }
}

fn quoted(path: &Path) -> String {
    format!("'{}'", path.display())
}

pub fn config() -> ToolchainConfig {
    ToolchainConfig::default()
}
