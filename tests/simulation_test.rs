/*!
Interactive simulation lifecycle against a fake `tck-simulate`.
*/
#![cfg(unix)]

mod common;

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use common::Sandbox;
use tchecker_lsp::{
    SimulationError, SimulationFrontend, SimulationOutput, SimulationState, Simulator,
    ToolchainConfig,
};

const FAKE_SIMULATOR: &str = r#"
echo ready
while IFS= read -r line; do
  if [ "$line" = "q" ]; then
    echo bye >&2
    exit 3
  fi
  echo "state $line"
done
"#;

const TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Started(u32),
    Output(u32, SimulationOutput),
    Prompt(u32),
    Closed(u32, Option<i32>),
}

#[derive(Default)]
struct RecordingFrontend {
    events: Mutex<Vec<Event>>,
    closed: Notify,
}

impl RecordingFrontend {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    async fn wait_for_output(&self, run: u32, line: &str) {
        let expected = Event::Output(run, SimulationOutput::Stdout(line.to_string()));
        tokio::time::timeout(TIMEOUT, async {
            while !self.events().contains(&expected) {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("no output {line:?}; got {:?}", self.events()));
    }

    async fn wait_closed(&self) {
        tokio::time::timeout(TIMEOUT, self.closed.notified())
            .await
            .expect("simulation did not close");
    }
}

#[async_trait]
impl SimulationFrontend for RecordingFrontend {
    async fn session_started(&self, run: u32, _file: &Path) {
        self.push(Event::Started(run));
    }

    async fn output(&self, run: u32, output: SimulationOutput) {
        self.push(Event::Output(run, output));
    }

    async fn request_input(&self, run: u32) {
        self.push(Event::Prompt(run));
    }

    async fn session_closed(&self, run: u32, exit_code: Option<i32>) {
        self.push(Event::Closed(run, exit_code));
        self.closed.notify_one();
    }
}

fn simulator_config(sandbox: &Sandbox) -> ToolchainConfig {
    let mut config = common::config();
    config.simulate_command = sandbox.tool("simulate.sh", FAKE_SIMULATOR);
    config
}

async fn wait_idle(simulator: &Simulator) {
    tokio::time::timeout(TIMEOUT, async {
        while simulator.state().await != SimulationState::Idle {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("simulation did not return to idle");
}

#[tokio::test]
async fn test_session_lifecycle() {
    let sandbox = Sandbox::new();
    let model = sandbox.model("model.tck");
    let config = simulator_config(&sandbox);
    let simulator = Simulator::new();
    let frontend = Arc::new(RecordingFrontend::default());

    let run = simulator.launch(&config, &model, frontend.clone()).await.unwrap();
    assert_eq!(run, 1);
    assert!(simulator.is_running().await);
    let pid = simulator.pid().await;
    assert!(pid.is_some());

    frontend.wait_for_output(1, "ready").await;
    simulator.submit("1").await.unwrap();
    frontend.wait_for_output(1, "state 1").await;

    simulator.submit("q").await.unwrap();
    frontend.wait_closed().await;
    wait_idle(&simulator).await;

    let events = frontend.events();
    assert_eq!(events.first(), Some(&Event::Started(1)));
    assert_eq!(events.last(), Some(&Event::Closed(1, Some(3))));
    assert!(events.contains(&Event::Output(1, SimulationOutput::Stderr("bye".to_string()))));
    assert!(events.iter().filter(|e| **e == Event::Prompt(1)).count() >= 2);
    assert_eq!(simulator.pid().await, None);
}

#[tokio::test]
async fn test_second_launch_is_rejected_while_running() {
    let sandbox = Sandbox::new();
    let model = sandbox.model("model.tck");
    let config = simulator_config(&sandbox);
    let simulator = Simulator::new();
    let frontend = Arc::new(RecordingFrontend::default());

    simulator.launch(&config, &model, frontend.clone()).await.unwrap();
    let pid = simulator.pid().await;

    let other = Arc::new(RecordingFrontend::default());
    let err = simulator.launch(&config, &model, other.clone()).await.unwrap_err();
    assert!(matches!(err, SimulationError::AlreadyRunning));
    assert!(err.to_string().starts_with("tck-simulate is already running"));
    assert_eq!(simulator.pid().await, pid);
    assert_eq!(simulator.run_count().await, 1);
    assert!(other.events().is_empty());

    simulator.submit("q").await.unwrap();
    frontend.wait_closed().await;
    wait_idle(&simulator).await;

    // a new session is possible once the previous one is gone
    let run = simulator.launch(&config, &model, other.clone()).await.unwrap();
    assert_eq!(run, 2);
    other.wait_for_output(2, "ready").await;
    simulator.submit("q").await.unwrap();
    other.wait_closed().await;
    wait_idle(&simulator).await;
}

#[tokio::test]
async fn test_input_requires_a_session() {
    let simulator = Simulator::new();
    assert!(matches!(simulator.submit("1").await, Err(SimulationError::NotRunning)));
    assert!(matches!(simulator.reprompt().await, Err(SimulationError::NotRunning)));
    assert_eq!(simulator.state().await, SimulationState::Idle);
}

#[tokio::test]
async fn test_stderr_lines_render_with_error_prefix() {
    let sandbox = Sandbox::new();
    let model = sandbox.model("model.tck");
    let mut config = common::config();
    config.simulate_command = sandbox.tool("simulate.sh", "echo 'no initial state' >&2\nexit 1");
    let simulator = Simulator::new();
    let frontend = Arc::new(RecordingFrontend::default());

    simulator.launch(&config, &model, frontend.clone()).await.unwrap();
    frontend.wait_closed().await;
    wait_idle(&simulator).await;

    let rendered: Vec<String> = frontend
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Event::Output(_, output) if output.is_stderr() => Some(output.render()),
            _ => None,
        })
        .collect();
    assert_eq!(rendered, vec!["ERROR: no initial state".to_string()]);
    assert_eq!(frontend.events().last(), Some(&Event::Closed(1, Some(1))));
}
