//! End-to-end runs through the real process runner.
#![cfg(unix)]

use std::path::Path;

use regcheck_core::api::{
    run_session, start_events_out, BenchmarkTest, ControlConfig, EventsOutConfig, Pattern,
    PerformanceFunction, Phase, RunContext, SanityCheck, TestDefinition, TokioProcessRunner,
    Verdict,
};
use regcheck_core::events_out::LifecycleEvent;

fn shell_test(name: &str, build: &[&str], script: &str) -> BenchmarkTest {
    let mut def = TestDefinition::new(name, "sh");
    def.executable_opts = vec!["-c".to_string(), script.to_string()];
    def.build_commands = build.iter().map(|c| c.to_string()).collect();
    def.valid_systems = vec!["*".to_string()];
    def.valid_environments = vec!["*".to_string()];
    BenchmarkTest::new(def)
        .with_sanity(SanityCheck::found(Pattern::new("Solution Validates").unwrap()))
        .with_performance(PerformanceFunction::parse("copy_bw", "MB/s", r"Copy:\s+(\S+)").unwrap())
}

fn ctx<'a>(
    runner: &'a TokioProcessRunner,
    control: &'a ControlConfig,
    workdir: &'a Path,
) -> RunContext<'a> {
    RunContext {
        runner,
        control,
        workdir,
        run_id: "it-run",
        events_out: None,
    }
}

#[tokio::test]
async fn build_output_is_visible_to_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let test = shell_test(
        "staged",
        &["printf 'Copy:   2500.5\\n' > out.txt"],
        "cat out.txt; echo 'Solution Validates'",
    );
    let runner = TokioProcessRunner::new();
    let control = ControlConfig::default();

    let session = run_session(&[&test], "generic", "builtin", &ctx(&runner, &control, dir.path())).await;
    let report = &session.tests[0];
    assert_eq!(report.verdict, Verdict::Passed, "{:?}", report.message);
    assert_eq!(report.metric_value("copy_bw"), Some(2500.5));
    assert!(dir.path().join("out.txt").exists());
}

#[tokio::test]
async fn failing_build_reports_its_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let test = shell_test(
        "broken",
        &["echo 'resolve failed' >&2; exit 3", "touch never.txt"],
        "echo 'Solution Validates'",
    );
    let runner = TokioProcessRunner::new();
    let control = ControlConfig::default();

    let session = run_session(&[&test], "generic", "builtin", &ctx(&runner, &control, dir.path())).await;
    let report = &session.tests[0];
    assert_eq!(report.verdict, Verdict::Failed);
    assert_eq!(report.failed_phase, Some(Phase::Build));
    let message = report.message.as_deref().unwrap_or_default();
    assert!(message.contains("exit code 3"), "{message}");
    assert!(message.contains("resolve failed"), "{message}");
    assert!(!dir.path().join("never.txt").exists());
    assert_eq!(session.exit_code(), 1);
}

#[tokio::test]
async fn nonzero_exit_fails_the_run_phase() {
    let dir = tempfile::tempdir().unwrap();
    let test = shell_test("crashes", &[], "echo 'Solution Validates'; exit 4");
    let runner = TokioProcessRunner::new();
    let control = ControlConfig::default();

    let session = run_session(&[&test], "generic", "builtin", &ctx(&runner, &control, dir.path())).await;
    assert_eq!(session.tests[0].failed_phase, Some(Phase::Run));

    let lenient = ControlConfig {
        fail_on_nonzero_exit: false,
        missing_metric: regcheck_core::api::MissingMetricPolicy::Report,
        ..ControlConfig::default()
    };
    let session = run_session(&[&test], "generic", "builtin", &ctx(&runner, &lenient, dir.path())).await;
    assert_eq!(session.tests[0].verdict, Verdict::Passed);
}

#[tokio::test]
async fn timed_out_run_fails() {
    let dir = tempfile::tempdir().unwrap();
    let test = shell_test("slow", &[], "sleep 5; echo 'Solution Validates'");
    let runner = TokioProcessRunner::new();
    let control = ControlConfig {
        phase_timeout_ms: 200,
        ..ControlConfig::default()
    };

    let session = run_session(&[&test], "generic", "builtin", &ctx(&runner, &control, dir.path())).await;
    assert_eq!(session.tests[0].verdict, Verdict::Failed);
    assert_eq!(session.tests[0].failed_phase, Some(Phase::Run));
}

#[tokio::test]
async fn session_writes_lifecycle_events() {
    let dir = tempfile::tempdir().unwrap();
    let events_path = dir.path().join("events.jsonl");
    let cfg = EventsOutConfig {
        enabled: true,
        path: events_path.display().to_string(),
        ..EventsOutConfig::default()
    };
    let (tx, handle) = start_events_out(&cfg).await.unwrap().unwrap();

    let ok = shell_test("ok", &[], "echo 'Copy: 1.0'; echo 'Solution Validates'");
    let mut elsewhere = shell_test("elsewhere", &[], "true");
    elsewhere.definition_mut().valid_systems = vec!["daint".to_string()];

    let runner = TokioProcessRunner::new();
    let control = ControlConfig::default();
    let context = RunContext {
        events_out: Some(&tx),
        ..ctx(&runner, &control, dir.path())
    };
    let session = run_session(&[&ok, &elsewhere], "eiger:mc", "builtin", &context).await;
    drop(context);
    handle.finish(tx).await;

    assert_eq!(session.totals().passed, 1);
    assert_eq!(session.totals().skipped, 1);

    let text = std::fs::read_to_string(&events_path).unwrap();
    let events: Vec<LifecycleEvent> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let kinds: Vec<(&str, Option<&str>)> = events
        .iter()
        .map(|e| (e.event_type.as_str(), e.test.as_deref()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("session.start", None),
            ("test.start", Some("ok")),
            ("test.result", Some("ok")),
            ("test.result", Some("elsewhere")),
            ("session.end", None),
        ]
    );
    assert!(events.iter().all(|e| e.run_id.as_deref() == Some("it-run")));
}
