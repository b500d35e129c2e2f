//! Custom server-to-client notifications driving the simulation UI.
//!
//! The client is expected to render `simulationStatus` as the launch/input
//! status-bar triggers, `simulationOutput` as an output log named
//! "TChecker Simulate #<run>" and `simulationPrompt` as an input box whose
//! value comes back through the `tchecker.simulateSubmit` command.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::notification::Notification;

use crate::toolchain::SimulationState;

pub enum SimulationStatus {}

impl Notification for SimulationStatus {
    type Params = SimulationStatusParams;
    const METHOD: &'static str = "tchecker/simulationStatus";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStatusParams {
    pub run: u32,
    pub state: SimulationState,
    pub launch_visible: bool,
    pub input_visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl SimulationStatusParams {
    pub fn new(run: u32, state: SimulationState) -> Self {
        Self {
            run,
            state,
            launch_visible: state.launch_visible(),
            input_visible: state.input_visible(),
            exit_code: None,
        }
    }
}

pub enum SimulationOutputNotification {}

impl Notification for SimulationOutputNotification {
    type Params = SimulationOutputParams;
    const METHOD: &'static str = "tchecker/simulationOutput";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputChannel {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutputParams {
    pub run: u32,
    /// Output log title
    pub log: String,
    pub channel: OutputChannel,
    /// Text to append (stderr lines carry the `ERROR:` prefix)
    pub text: String,
}

pub enum SimulationPrompt {}

impl Notification for SimulationPrompt {
    type Params = SimulationPromptParams;
    const METHOD: &'static str = "tchecker/simulationPrompt";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationPromptParams {
    pub run: u32,
    pub title: String,
    pub placeholder: String,
}

/// Title of the output log of simulation `run`
pub fn output_log_title(run: u32) -> String {
    format!("TChecker Simulate #{run}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_format() {
        let params = SimulationStatusParams::new(2, SimulationState::AwaitingInput);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({ "run": 2, "state": "awaitingInput", "launchVisible": false, "inputVisible": true })
        );
    }

    #[test]
    fn test_output_wire_format() {
        let params = SimulationOutputParams {
            run: 1,
            log: output_log_title(1),
            channel: OutputChannel::Stderr,
            text: "ERROR: boom".into(),
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({ "run": 1, "log": "TChecker Simulate #1", "channel": "stderr", "text": "ERROR: boom" })
        );
    }
}
