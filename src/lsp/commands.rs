//! `workspace/executeCommand` surface.

use serde_json::Value;
use tower_lsp::lsp_types::Url;

use crate::toolchain::ModelCheckMode;

pub const SYNTAX: &str = "tchecker.syntax";
pub const MODEL_CHECK: &str = "tchecker.modelCheck";
pub const SIMULATE: &str = "tchecker.simulate";
pub const SIMULATE_INPUT: &str = "tchecker.simulateInput";
pub const SIMULATE_SUBMIT: &str = "tchecker.simulateSubmit";

pub const ALL_COMMANDS: &[&str] = &[SYNTAX, MODEL_CHECK, SIMULATE, SIMULATE_INPUT, SIMULATE_SUBMIT];

pub const GET_CURRENT_FILE_ERROR_MESSAGE: &str =
    "Failed to recognise the input file. Please run the command with a tck file open.";

/// A parsed editor command
#[derive(Debug, Clone, PartialEq)]
pub enum ServerCommand {
    /// `[uri?]`
    Syntax { uri: Option<Url> },
    /// `[mode?, uri?]`, mode defaults to reach
    ModelCheck { mode: ModelCheckMode, uri: Option<Url> },
    /// `[uri?]`
    Simulate { uri: Option<Url> },
    ShowInput,
    /// `[text]`
    Submit { text: String },
}

impl ServerCommand {
    pub fn parse(command: &str, arguments: &[Value]) -> Result<Self, String> {
        match command {
            SYNTAX => Ok(ServerCommand::Syntax { uri: uri_arg(arguments.first())? }),
            MODEL_CHECK => {
                let mode = match arguments.first() {
                    None | Some(Value::Null) => ModelCheckMode::Reach,
                    Some(Value::String(s)) => s.parse()?,
                    Some(other) => return Err(format!("Expected a mode string, got {other}")),
                };
                Ok(ServerCommand::ModelCheck { mode, uri: uri_arg(arguments.get(1))? })
            }
            SIMULATE => Ok(ServerCommand::Simulate { uri: uri_arg(arguments.first())? }),
            SIMULATE_INPUT => Ok(ServerCommand::ShowInput),
            SIMULATE_SUBMIT => match arguments.first() {
                Some(Value::String(text)) => Ok(ServerCommand::Submit { text: text.clone() }),
                _ => Err(format!("{SIMULATE_SUBMIT} expects the submitted text as its argument")),
            },
            other => Err(format!("Unknown command: {other}")),
        }
    }
}

fn uri_arg(value: Option<&Value>) -> Result<Option<Url>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Url::parse(s).map(Some).map_err(|e| format!("Invalid document URI {s}: {e}")),
        Some(other) => Err(format!("Expected a document URI, got {other}")),
    }
}
