/*!
Reachability and liveness runs against fake `tck-reach` / `tck-liveness`.
*/
#![cfg(unix)]

mod common;

use pretty_assertions::assert_eq;

use common::Sandbox;
use tchecker_lsp::{Dispatcher, ModelCheckMode, NullPublisher, Severity};

#[tokio::test]
async fn test_reachability_verdict_and_stats() {
    let sandbox = Sandbox::new();
    let model = sandbox.model("model.tck");
    let mut config = common::config();
    config.reach_command = sandbox.tool(
        "reach.sh",
        "printf 'REACHABLE true\\nSTORED_STATES 12\\nVISITED_STATES 14\\n'",
    );

    let report = tchecker_lsp::model_check_file(&config, ModelCheckMode::Reach, &model)
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.verdict, Some(true));
    assert_eq!(report.stat("STORED_STATES"), Some("12"));
    assert_eq!(report.stat("VISITED_STATES"), Some("14"));
    assert!(report.diagnostics.is_empty());
    assert!(report.summary().starts_with("Reachable"));
}

#[tokio::test]
async fn test_liveness_uses_its_own_command() {
    let sandbox = Sandbox::new();
    let model = sandbox.model("model.tck");
    let mut config = common::config();
    config.reach_command = sandbox.tool("reach.sh", "echo 'REACHABLE true'");
    config.liveness_command = sandbox.tool("liveness.sh", "echo 'CYCLE false'");

    let report = tchecker_lsp::model_check_file(&config, ModelCheckMode::Liveness, &model)
        .await
        .unwrap();

    assert_eq!(report.mode, ModelCheckMode::Liveness);
    assert_eq!(report.verdict, Some(false));
    assert_eq!(report.summary(), "No accepting cycle found.");
}

#[tokio::test]
async fn test_failed_run_records_error_diagnostics() {
    let sandbox = Sandbox::new();
    let model = sandbox.model("model.tck");
    let mut config = common::config();
    config.reach_command = sandbox.tool("reach.sh", "echo '6.1-4: undeclared event' >&2\nexit 2");

    let dispatcher = Dispatcher::new();
    let report = dispatcher
        .model_check(&config, ModelCheckMode::Reach, &model, &NullPublisher)
        .await
        .unwrap();

    assert!(!report.success);
    assert_eq!(report.verdict, None);
    assert_eq!(report.summary(), "tck-reach failed. Please check the 'Problems' panel for more details.");
    assert_eq!(dispatcher.count(Severity::Error).await, 1);
    let recorded = dispatcher.diagnostics_for(&model).await;
    assert_eq!(recorded[0].message, "6.1-4: undeclared event");
    assert_eq!(recorded[0].span.start.line, 5);
}
