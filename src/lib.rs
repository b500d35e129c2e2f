/*!
# TChecker LSP

Editor support for the [TChecker](https://github.com/ticktac-project/tchecker)
timed-automata toolchain. The crate does not parse models itself: it runs the
`tck-*` binaries, turns their output into diagnostics and offers lightweight
authoring helpers over the text of `.tck` files.

## Architecture

```text
tchecker-lsp
├── Core         - positions, severities, tool diagnostics, errors
├── Config       - layered toolchain configuration (defaults, TOML, env, LSP)
├── Language     - keyword table and the declaration scanner
├── Toolchain    - process runner, stderr translator, syntax / model-check /
│                  simulation dispatchers
├── Diagnostics  - the shared diagnostics collection
├── Dispatch     - clear-then-publish binding of one-shot commands
└── LSP          - tower-lsp server, providers, custom notifications
```

## Usage

### CLI
```bash
# Syntax check, exit code 1 on errors
tchecker-lsp check model.tck

# Reachability / liveness
tchecker-lsp model-check model.tck --mode liveness

# Interactive simulation in the terminal
tchecker-lsp simulate model.tck

# Language server (stdio, or TCP with --port)
tchecker-lsp lsp
```

### Library
```rust,no_run
use tchecker_lsp::{check_file, ToolchainConfig};

# async fn demo() -> anyhow::Result<()> {
let config = ToolchainConfig::default();
let outcome = check_file(&config, "model.tck").await?;
println!("{}", outcome.message());
# Ok(())
# }
```
*/

pub mod cli_common;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod dispatch;
pub mod language;
pub mod lsp;
pub mod toolchain;

// Re-export main types for convenience
pub use config::{Tool, ToolchainConfig, ToolchainOverrides};
pub use core::{Position, Severity, SimulationError, Span, ToolDiagnostic, ToolError};
pub use diagnostics::DiagnosticCollection;
pub use dispatch::{DiagnosticsPublisher, Dispatcher, NullPublisher};
pub use language::{Keyword, KEYWORDS};
pub use toolchain::{
    ModelCheckMode, ModelCheckReport, SimulationFrontend, SimulationOutput, SimulationState,
    Simulator, SyntaxOutcome,
};

use std::path::Path;

/// Runs `tck-syntax` on a single file
pub async fn check_file<P: AsRef<Path>>(
    config: &ToolchainConfig,
    path: P,
) -> Result<SyntaxOutcome, ToolError> {
    toolchain::run_syntax_check(config, path.as_ref()).await
}

/// Runs reachability or liveness checking on a single file
pub async fn model_check_file<P: AsRef<Path>>(
    config: &ToolchainConfig,
    mode: ModelCheckMode,
    path: P,
) -> Result<ModelCheckReport, ToolError> {
    toolchain::run_model_check(config, mode, path.as_ref()).await
}
