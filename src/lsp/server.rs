/*!
# TChecker Language Server

Editor events map onto the toolchain dispatchers and the text providers:

- completion / hover / signature help: answered synchronously from the
  cached document text
- `tchecker.syntax`, `tchecker.modelCheck`: one-shot tool runs whose stderr
  becomes diagnostics
- `tchecker.simulate*`: the interactive simulation session
*/

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::{Error as RpcError, Result as RpcResult};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use super::commands::{ServerCommand, ALL_COMMANDS, GET_CURRENT_FILE_ERROR_MESSAGE};
use super::diagnostics::ClientPublisher;
use super::simulation::LspSimulationFrontend;
use super::{completion, hover, signature};
use crate::config::{ToolchainConfig, ToolchainOverrides, SETTINGS_SECTION};
use crate::core::{is_tck_path, SimulationError};
use crate::dispatch::Dispatcher;
use crate::toolchain::{ModelCheckMode, Simulator, SyntaxOutcome};

/// TChecker Language Server
pub struct TCheckerLanguageServer {
    client: Client,
    /// Кэш открытых документов
    documents: Arc<RwLock<HashMap<Url, DocumentInfo>>>,
    /// Last `.tck` document opened or edited; default target of commands
    active_document: Arc<RwLock<Option<Url>>>,
    config: Arc<RwLock<ToolchainConfig>>,
    /// `--config` file given on the command line
    config_file: Option<PathBuf>,
    supports_configuration_pull: AtomicBool,
    dispatcher: Dispatcher,
    simulator: Simulator,
}

/// Информация об открытом документе
#[derive(Debug, Clone)]
struct DocumentInfo {
    version: i32,
    text: String,
}

impl TCheckerLanguageServer {
    pub fn new(client: Client) -> Self {
        Self::with_config_file(client, None)
    }

    pub fn with_config_file(client: Client, config_file: Option<PathBuf>) -> Self {
        Self {
            client,
            documents: Arc::new(RwLock::new(HashMap::new())),
            active_document: Arc::new(RwLock::new(None)),
            config: Arc::new(RwLock::new(ToolchainConfig::default())),
            config_file,
            supports_configuration_pull: AtomicBool::new(false),
            dispatcher: Dispatcher::new(),
            simulator: Simulator::new(),
        }
    }

    async fn load_config(&self, workspace: Option<PathBuf>, init_options: Option<&serde_json::Value>) {
        let mut config = match ToolchainConfig::load(self.config_file.as_deref(), workspace.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                let error_msg = format!("Failed to load TChecker configuration: {e:#}");
                tracing::error!("{}", error_msg);
                self.client.show_message(MessageType::ERROR, &error_msg).await;
                ToolchainConfig::default()
            }
        };

        if let Some(options) = init_options {
            match ToolchainOverrides::from_settings(options) {
                Ok(overrides) => config.apply(overrides),
                Err(e) => tracing::warn!("Ignoring initializationOptions: {:#}", e),
            }
        }

        tracing::debug!(?config, "Toolchain configuration loaded");
        *self.config.write().await = config;
    }

    /// Configuration at command time: the stored layers refreshed with the
    /// client's current settings when it supports `workspace/configuration`.
    async fn current_config(&self) -> ToolchainConfig {
        if self.supports_configuration_pull.load(Ordering::Relaxed) {
            let item = ConfigurationItem { scope_uri: None, section: Some(SETTINGS_SECTION.to_string()) };
            match self.client.configuration(vec![item]).await {
                Ok(values) => {
                    if let Some(value) = values.first() {
                        match ToolchainOverrides::from_settings(value) {
                            Ok(overrides) => self.config.write().await.apply(overrides),
                            Err(e) => tracing::warn!("Ignoring client settings: {:#}", e),
                        }
                    }
                }
                Err(e) => tracing::debug!("workspace/configuration failed: {}", e),
            }
        }
        self.config.read().await.clone()
    }

    /// File a command operates on: the explicit URI, else the active document.
    async fn resolve_file(&self, uri: Option<Url>) -> Option<PathBuf> {
        let uri = match uri {
            Some(uri) => Some(uri),
            None => self.active_document.read().await.clone(),
        };
        let path = uri.and_then(|u| u.to_file_path().ok());
        if path.is_none() {
            self.client.show_message(MessageType::ERROR, GET_CURRENT_FILE_ERROR_MESSAGE).await;
        }
        path
    }

    async fn remember_active(&self, uri: &Url) {
        let is_tck = uri.to_file_path().map(|p| is_tck_path(&p)).unwrap_or(false);
        if is_tck {
            *self.active_document.write().await = Some(uri.clone());
        }
    }

    async fn run_syntax(&self, uri: Option<Url>) -> RpcResult<Option<serde_json::Value>> {
        let Some(file) = self.resolve_file(uri).await else {
            return Ok(None);
        };
        let config = self.current_config().await;
        let publisher = ClientPublisher::new(self.client.clone());

        match self.dispatcher.syntax_check(&config, &file, &publisher).await {
            Ok(outcome) => {
                let message_type = match outcome {
                    SyntaxOutcome::Failed(_) => MessageType::ERROR,
                    SyntaxOutcome::Warnings(_) => MessageType::WARNING,
                    SyntaxOutcome::Clean => MessageType::INFO,
                };
                self.client.show_message(message_type, outcome.message()).await;
                Ok(Some(serde_json::json!({
                    "status": outcome.status(),
                    "diagnostics": outcome.diagnostics().len(),
                })))
            }
            Err(e) => {
                tracing::error!("Syntax check failed to run: {}", e);
                self.client.show_message(MessageType::ERROR, e.to_string()).await;
                Ok(None)
            }
        }
    }

    async fn run_model_check(&self, mode: ModelCheckMode, uri: Option<Url>) -> RpcResult<Option<serde_json::Value>> {
        let Some(file) = self.resolve_file(uri).await else {
            return Ok(None);
        };
        let config = self.current_config().await;
        let publisher = ClientPublisher::new(self.client.clone());

        match self.dispatcher.model_check(&config, mode, &file, &publisher).await {
            Ok(report) => {
                if !report.stdout.is_empty() {
                    self.client.log_message(MessageType::INFO, report.stdout.trim_end()).await;
                }
                let message_type = if report.success { MessageType::INFO } else { MessageType::ERROR };
                self.client.show_message(message_type, report.summary()).await;
                serde_json::to_value(&report).map(Some).map_err(|e| {
                    let mut err = RpcError::internal_error();
                    err.message = e.to_string().into();
                    err
                })
            }
            Err(e) => {
                tracing::error!("Model checking failed to run: {}", e);
                self.client.show_message(MessageType::ERROR, e.to_string()).await;
                Ok(None)
            }
        }
    }

    async fn run_simulation(&self, uri: Option<Url>) -> RpcResult<Option<serde_json::Value>> {
        if self.simulator.is_running().await {
            self.client
                .show_message(MessageType::ERROR, SimulationError::AlreadyRunning.to_string())
                .await;
            return Ok(None);
        }

        let Some(file) = self.resolve_file(uri).await else {
            return Ok(None);
        };
        let config = self.current_config().await;
        let publisher = ClientPublisher::new(self.client.clone());
        self.dispatcher.clear(&publisher).await;

        let frontend = Arc::new(LspSimulationFrontend::new(self.client.clone()));

        match self.simulator.launch(&config, &file, frontend).await {
            Ok(run) => Ok(Some(serde_json::json!({ "run": run }))),
            Err(e) => {
                tracing::error!("Simulation not started: {}", e);
                self.client.show_message(MessageType::ERROR, e.to_string()).await;
                Ok(None)
            }
        }
    }

    async fn simulation_input(&self, text: Option<String>) -> RpcResult<Option<serde_json::Value>> {
        let result = match text {
            Some(text) => self.simulator.submit(text).await,
            None => self.simulator.reprompt().await,
        };
        if let Err(e) = result {
            self.client.show_message(MessageType::WARNING, e.to_string()).await;
        }
        Ok(None)
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for TCheckerLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> RpcResult<InitializeResult> {
        tracing::info!("Initializing TChecker Language Server");

        #[allow(deprecated)]
        let root_uri = params.root_uri.clone();
        let workspace = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .map(|folder| folder.uri.clone())
            .or(root_uri)
            .and_then(|uri| uri.to_file_path().ok());

        let pull = params
            .capabilities
            .workspace
            .as_ref()
            .and_then(|w| w.configuration)
            .unwrap_or(false);
        self.supports_configuration_pull.store(pull, Ordering::Relaxed);

        self.load_config(workspace, params.initialization_options.as_ref()).await;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                position_encoding: Some(PositionEncodingKind::UTF16),
                text_document_sync: Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    save: Some(TextDocumentSyncSaveOptions::Supported(true)),
                    ..Default::default()
                })),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(completion::TRIGGER_CHARACTERS.iter().map(|c| c.to_string()).collect()),
                    ..Default::default()
                }),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                signature_help_provider: Some(SignatureHelpOptions {
                    trigger_characters: Some(signature::TRIGGER_CHARACTERS.iter().map(|c| c.to_string()).collect()),
                    retrigger_characters: None,
                    work_done_progress_options: Default::default(),
                }),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: ALL_COMMANDS.iter().map(|c| c.to_string()).collect(),
                    work_done_progress_options: Default::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "tchecker-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        tracing::info!("TChecker Language Server initialized");
        self.client
            .log_message(MessageType::INFO, "TChecker Language Server ready")
            .await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        tracing::debug!("Document opened: {}", params.text_document.uri);
        self.remember_active(&params.text_document.uri).await;
        self.documents.write().await.insert(
            params.text_document.uri,
            DocumentInfo {
                version: params.text_document.version,
                text: params.text_document.text,
            },
        );
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // FULL sync: the last change carries the whole text
        if let Some(change) = params.content_changes.into_iter().last() {
            tracing::debug!("Document changed: {}", params.text_document.uri);
            self.remember_active(&params.text_document.uri).await;
            let mut documents = self.documents.write().await;
            let entry = documents.entry(params.text_document.uri).or_insert(DocumentInfo {
                version: params.text_document.version,
                text: String::new(),
            });
            entry.version = params.text_document.version;
            entry.text = change.text;
            tracing::trace!(version = entry.version, bytes = entry.text.len(), "Document text replaced");
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        if !self.config.read().await.check_on_save {
            return;
        }
        if uri.to_file_path().map(|p| is_tck_path(&p)).unwrap_or(false) {
            tracing::debug!("Checking saved document: {}", uri);
            let _ = self.run_syntax(Some(uri)).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::debug!("Document closed: {}", uri);

        self.documents.write().await.remove(&uri);
        {
            let mut active = self.active_document.write().await;
            if active.as_ref() == Some(&uri) {
                *active = None;
            }
        }

        if let Ok(path) = uri.to_file_path() {
            if self.dispatcher.forget(&path).await {
                self.client.publish_diagnostics(uri, vec![], None).await;
            }
        }
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        match ToolchainOverrides::from_settings(&params.settings) {
            Ok(overrides) => {
                self.config.write().await.apply(overrides);
                tracing::info!("Toolchain configuration updated");
            }
            Err(e) => tracing::warn!("Ignoring configuration change: {:#}", e),
        }
    }

    async fn completion(&self, params: CompletionParams) -> RpcResult<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let documents = self.documents.read().await;
        Ok(documents
            .get(uri)
            .and_then(|doc| completion::provide_completion(&doc.text, position))
            .map(CompletionResponse::Array))
    }

    async fn hover(&self, params: HoverParams) -> RpcResult<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let documents = self.documents.read().await;
        Ok(documents.get(uri).and_then(|doc| hover::provide_hover(&doc.text, position)))
    }

    async fn signature_help(&self, params: SignatureHelpParams) -> RpcResult<Option<SignatureHelp>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let documents = self.documents.read().await;
        Ok(documents
            .get(uri)
            .and_then(|doc| signature::provide_signature_help(&doc.text, position)))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> RpcResult<Option<serde_json::Value>> {
        tracing::info!("Executing command {}", params.command);

        let command = ServerCommand::parse(&params.command, &params.arguments).map_err(RpcError::invalid_params)?;
        match command {
            ServerCommand::Syntax { uri } => self.run_syntax(uri).await,
            ServerCommand::ModelCheck { mode, uri } => self.run_model_check(mode, uri).await,
            ServerCommand::Simulate { uri } => self.run_simulation(uri).await,
            ServerCommand::ShowInput => self.simulation_input(None).await,
            ServerCommand::Submit { text } => self.simulation_input(Some(text)).await,
        }
    }

    async fn shutdown(&self) -> RpcResult<()> {
        tracing::info!("TChecker Language Server shutting down");
        if let Some(pid) = self.simulator.pid().await {
            tracing::info!(pid, "Simulation still running at shutdown; it is killed with the server");
        }
        Ok(())
    }
}
