/*!
# Interactive simulation

Drives one long-lived `tck-simulate` process:

```text
Idle -> Launching -> AwaitingInput <-> Feeding -> Closing -> Idle
```

While awaiting input the session races the next submitted line against the
process exit. A submitted line is written to the simulator's stdin followed
by a newline. The exit notification (not a poll) moves the session to
`Closing`, which drains the output readers, tells the frontend and goes back
to `Idle`.

Only one session exists at a time. The `Simulator` handle is cheap to clone
and is owned by whoever dispatches commands (the language server or the CLI).
*/

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use super::runner::{display_command, shell_command};
use crate::config::{Tool, ToolchainConfig};
use crate::core::{SimulationError, ToolError};

pub const INPUT_BOX_TITLE: &str = "tck-simulate";
pub const INPUT_BOX_PLACEHOLDER: &str = "Next state...";
pub const EXECUTION_MESSAGE: &str = "Executing tck-simulate...";

/// How long output readers may keep draining after the process exited
const DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Session lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SimulationState {
    #[default]
    Idle,
    Launching,
    AwaitingInput,
    Feeding,
    Closing,
}

/// Inputs of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEvent {
    Start,
    Spawned,
    SpawnFailed,
    Submitted,
    Written,
    Exited,
    Closed,
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for SimulationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl SimulationState {
    /// The transition function.
    pub fn on(self, event: SimulationEvent) -> Result<Self, SimulationError> {
        use SimulationEvent as E;
        use SimulationState as S;

        match (self, event) {
            (S::Idle, E::Start) => Ok(S::Launching),
            (_, E::Start) => Err(SimulationError::AlreadyRunning),
            (S::Launching, E::Spawned) => Ok(S::AwaitingInput),
            (S::Launching, E::SpawnFailed) => Ok(S::Idle),
            (S::AwaitingInput, E::Submitted) => Ok(S::Feeding),
            (S::Feeding, E::Written) => Ok(S::AwaitingInput),
            (S::AwaitingInput | S::Feeding, E::Exited) => Ok(S::Closing),
            (S::Closing, E::Closed) => Ok(S::Idle),
            (from, event) => Err(SimulationError::InvalidTransition {
                from: from.to_string(),
                event: event.to_string(),
            }),
        }
    }

    pub fn is_running(self) -> bool {
        self != SimulationState::Idle
    }

    /// The "launch simulation" trigger is offered only when idle.
    pub fn launch_visible(self) -> bool {
        self == SimulationState::Idle
    }

    /// The "show input box" trigger is offered while the process is alive.
    pub fn input_visible(self) -> bool {
        matches!(self, SimulationState::AwaitingInput | SimulationState::Feeding)
    }
}

/// One line of simulator output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationOutput {
    Stdout(String),
    Stderr(String),
}

impl SimulationOutput {
    pub fn is_stderr(&self) -> bool {
        matches!(self, SimulationOutput::Stderr(_))
    }

    pub fn line(&self) -> &str {
        match self {
            SimulationOutput::Stdout(line) | SimulationOutput::Stderr(line) => line,
        }
    }

    /// Text appended to the output log
    pub fn render(&self) -> String {
        match self {
            SimulationOutput::Stdout(line) => line.clone(),
            SimulationOutput::Stderr(line) => format!("ERROR: {line}"),
        }
    }
}

/// The UI side of a simulation: output log, input box and triggers.
#[async_trait]
pub trait SimulationFrontend: Send + Sync {
    /// Output log opened; launch trigger hidden, input trigger shown.
    async fn session_started(&self, run: u32, file: &Path);

    async fn output(&self, run: u32, output: SimulationOutput);

    /// Show the input box and wait for the user to submit a line.
    async fn request_input(&self, run: u32);

    /// Input widgets hidden, launch trigger shown again.
    async fn session_closed(&self, run: u32, exit_code: Option<i32>);
}

/// Mutable state of the (single) simulation session
#[derive(Default)]
pub struct SimulationSession {
    pub state: SimulationState,
    /// Number of sessions launched so far; names the output log
    pub run: u32,
    pub pid: Option<u32>,
    input: Option<mpsc::UnboundedSender<String>>,
    frontend: Option<Arc<dyn SimulationFrontend>>,
}

impl SimulationSession {
    fn reset(&mut self) {
        self.pid = None;
        self.input = None;
        self.frontend = None;
    }
}

/// Handle on the simulation session
#[derive(Clone, Default)]
pub struct Simulator {
    session: Arc<Mutex<SimulationSession>>,
}

impl Simulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn state(&self) -> SimulationState {
        self.session.lock().await.state
    }

    pub async fn is_running(&self) -> bool {
        self.state().await.is_running()
    }

    /// OS process id of the running simulator
    pub async fn pid(&self) -> Option<u32> {
        self.session.lock().await.pid
    }

    pub async fn run_count(&self) -> u32 {
        self.session.lock().await.run
    }

    /// Starts `tck-simulate` on `file` and returns the run number.
    ///
    /// Fails with [`SimulationError::AlreadyRunning`] without touching the
    /// current session when one is active.
    pub async fn launch(
        &self,
        config: &ToolchainConfig,
        file: &Path,
        frontend: Arc<dyn SimulationFrontend>,
    ) -> Result<u32, SimulationError> {
        let mut session = self.session.lock().await;
        session.state = session.state.on(SimulationEvent::Start)?;

        let command = display_command(config, Tool::Simulate, file);
        tracing::info!("Launching simulation `{}`", command);

        let spawned = shell_command(&config.command_for(Tool::Simulate), file)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(source) => {
                session.state = session.state.on(SimulationEvent::SpawnFailed)?;
                return Err(ToolError::Spawn { command, source }.into());
            }
        };

        session.run += 1;
        let run = session.run;
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        session.pid = child.id();
        session.input = Some(input_tx);
        session.frontend = Some(Arc::clone(&frontend));
        session.state = session.state.on(SimulationEvent::Spawned)?;
        tracing::debug!(run, pid = ?session.pid, "Simulation spawned");
        drop(session);

        frontend.session_started(run, file).await;

        let stdin = child.stdin.take();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_forwarder(stdout, run, Arc::clone(&frontend), SimulationOutput::Stdout));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_forwarder(stderr, run, Arc::clone(&frontend), SimulationOutput::Stderr));
        }

        tokio::spawn(self.clone().drive(run, child, stdin, input_rx, readers, frontend));
        Ok(run)
    }

    /// Queues one line of user input for the simulator.
    pub async fn submit(&self, line: impl Into<String>) -> Result<(), SimulationError> {
        let session = self.session.lock().await;
        match (&session.input, session.state.is_running()) {
            (Some(tx), true) => tx.send(line.into()).map_err(|_| SimulationError::NotRunning),
            _ => Err(SimulationError::NotRunning),
        }
    }

    /// Shows the input box again.
    pub async fn reprompt(&self) -> Result<(), SimulationError> {
        let (run, frontend) = {
            let session = self.session.lock().await;
            match (&session.frontend, session.state.input_visible()) {
                (Some(frontend), true) => (session.run, Arc::clone(frontend)),
                _ => return Err(SimulationError::NotRunning),
            }
        };
        frontend.request_input(run).await;
        Ok(())
    }

    async fn transition(&self, event: SimulationEvent) {
        let mut session = self.session.lock().await;
        match session.state.on(event) {
            Ok(next) => session.state = next,
            Err(e) => tracing::error!("{}", e),
        }
    }

    async fn drive(
        self,
        run: u32,
        mut child: Child,
        mut stdin: Option<ChildStdin>,
        mut input: mpsc::UnboundedReceiver<String>,
        readers: Vec<JoinHandle<()>>,
        frontend: Arc<dyn SimulationFrontend>,
    ) {
        let exit_code = loop {
            frontend.request_input(run).await;

            tokio::select! {
                status = child.wait() => {
                    break match status {
                        Ok(status) => status.code(),
                        Err(e) => {
                            tracing::warn!(run, "Failed to wait for the simulator: {}", e);
                            None
                        }
                    };
                }
                Some(line) = input.recv() => {
                    self.transition(SimulationEvent::Submitted).await;
                    if let Some(pipe) = stdin.as_mut() {
                        if let Err(e) = write_line(pipe, &line).await {
                            tracing::warn!(run, "Failed to feed the simulator: {}", e);
                        }
                    }
                    self.transition(SimulationEvent::Written).await;
                }
            }
        };

        tracing::info!(run, ?exit_code, "Simulation process exited");
        self.transition(SimulationEvent::Exited).await;
        drop(stdin);

        for reader in readers {
            if tokio::time::timeout(DRAIN_TIMEOUT, reader).await.is_err() {
                tracing::debug!(run, "Output reader still busy after exit, detaching");
            }
        }

        frontend.session_closed(run, exit_code).await;

        let mut session = self.session.lock().await;
        session.reset();
        match session.state.on(SimulationEvent::Closed) {
            Ok(next) => session.state = next,
            Err(e) => tracing::error!("{}", e),
        }
    }
}

async fn write_line(pipe: &mut ChildStdin, line: &str) -> std::io::Result<()> {
    pipe.write_all(line.as_bytes()).await?;
    pipe.write_all(b"\n").await?;
    pipe.flush().await
}

fn spawn_forwarder<R>(
    reader: R,
    run: u32,
    frontend: Arc<dyn SimulationFrontend>,
    channel: fn(String) -> SimulationOutput,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = reader;
        let mut buf = [0u8; 4096];
        let mut pending: Vec<u8> = Vec::new();

        loop {
            let n = match reader.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(run, "Simulator output stream failed: {}", e);
                    break;
                }
            };
            pending.extend_from_slice(&buf[..n]);

            // a split multi-byte character waits for the next chunk
            let ready = match std::str::from_utf8(&pending) {
                Ok(_) => pending.len(),
                Err(e) if e.error_len().is_none() => e.valid_up_to(),
                Err(_) => pending.len(),
            };
            if ready == 0 {
                continue;
            }
            let chunk: Vec<u8> = pending.drain(..ready).collect();
            for line in chunk_lines(&String::from_utf8_lossy(&chunk)) {
                frontend.output(run, channel(line)).await;
            }
        }

        if !pending.is_empty() {
            for line in chunk_lines(&String::from_utf8_lossy(&pending)) {
                frontend.output(run, channel(line)).await;
            }
        }
    })
}

/// Splits one output chunk into log lines; a chunk without a trailing
/// newline (typically a prompt) is still emitted.
fn chunk_lines(chunk: &str) -> Vec<String> {
    let chunk = chunk.strip_suffix('\n').unwrap_or(chunk);
    chunk
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
