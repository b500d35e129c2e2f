//! Simulation frontend backed by the LSP client.

use async_trait::async_trait;
use std::path::Path;
use tower_lsp::lsp_types::MessageType;
use tower_lsp::Client;

use super::notifications::{
    output_log_title, OutputChannel, SimulationOutputNotification, SimulationOutputParams,
    SimulationPrompt, SimulationPromptParams, SimulationStatus, SimulationStatusParams,
};
use crate::toolchain::simulation::{EXECUTION_MESSAGE, INPUT_BOX_PLACEHOLDER, INPUT_BOX_TITLE};
use crate::toolchain::{SimulationFrontend, SimulationOutput, SimulationState};

pub struct LspSimulationFrontend {
    client: Client,
}

impl LspSimulationFrontend {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn append(&self, run: u32, channel: OutputChannel, text: String) {
        self.client
            .send_notification::<SimulationOutputNotification>(SimulationOutputParams {
                run,
                log: output_log_title(run),
                channel,
                text,
            })
            .await;
    }
}

#[async_trait]
impl SimulationFrontend for LspSimulationFrontend {
    async fn session_started(&self, run: u32, file: &Path) {
        self.client
            .send_notification::<SimulationStatus>(SimulationStatusParams::new(run, SimulationState::AwaitingInput))
            .await;
        self.append(run, OutputChannel::Stdout, EXECUTION_MESSAGE.to_string()).await;
        self.append(run, OutputChannel::Stdout, String::new()).await;
        self.client
            .log_message(MessageType::INFO, format!("{} started on {}", output_log_title(run), file.display()))
            .await;
    }

    async fn output(&self, run: u32, output: SimulationOutput) {
        let channel = if output.is_stderr() { OutputChannel::Stderr } else { OutputChannel::Stdout };
        self.append(run, channel, output.render()).await;
    }

    async fn request_input(&self, run: u32) {
        self.client
            .send_notification::<SimulationPrompt>(SimulationPromptParams {
                run,
                title: INPUT_BOX_TITLE.to_string(),
                placeholder: INPUT_BOX_PLACEHOLDER.to_string(),
            })
            .await;
    }

    async fn session_closed(&self, run: u32, exit_code: Option<i32>) {
        let mut params = SimulationStatusParams::new(run, SimulationState::Idle);
        params.exit_code = exit_code;
        self.client.send_notification::<SimulationStatus>(params).await;
        self.client
            .log_message(MessageType::INFO, format!("{} finished (exit code {:?})", output_log_title(run), exit_code))
            .await;
    }
}
