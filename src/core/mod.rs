/*!
# Core Module

Shared types: positions, severities, tool diagnostics and error enums.
*/

pub mod errors;
pub mod fs_utils;
pub mod position;

pub use errors::{Severity, SimulationError, ToolDiagnostic, ToolError};
pub use fs_utils::{is_tck_path, read_tck_file};
pub use position::{Position, Span};
