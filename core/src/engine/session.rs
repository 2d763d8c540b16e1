use super::run::run_test;
use super::types::RunContext;
use crate::definition::BenchmarkTest;
use crate::events_out::{write_event, LifecycleEvent};
use crate::report::SessionReport;

/// Run the selected tests one after another.
pub async fn run_session(
    tests: &[&BenchmarkTest],
    system: &str,
    environ: &str,
    ctx: &RunContext<'_>,
) -> SessionReport {
    let mut session = SessionReport::new(ctx.run_id, system, environ);
    write_event(
        ctx.events_out,
        &LifecycleEvent::new("session.start")
            .run_id(ctx.run_id)
            .data(serde_json::json!({
                "system": system,
                "environ": environ,
                "tests": tests.iter().map(|t| t.name()).collect::<Vec<_>>(),
                "runner": ctx.runner.name(),
            })),
    )
    .await;

    for test in tests {
        let report = run_test(test, system, environ, ctx).await;
        session.tests.push(report);
    }

    write_event(
        ctx.events_out,
        &LifecycleEvent::new("session.end")
            .run_id(ctx.run_id)
            .data(serde_json::to_value(session.totals()).unwrap_or(serde_json::Value::Null)),
    )
    .await;
    session
}
