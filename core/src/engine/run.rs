use std::time::Instant;

use super::post::evaluate_output;
use super::pre::{build, configure};
use super::types::{InPhase, PhaseFailure, RunContext};
use crate::definition::{BenchmarkTest, Phase, TestCase};
use crate::error::CheckError;
use crate::events_out::{write_event, LifecycleEvent};
use crate::report::{MetricOutcome, TestReport, Verdict};
use crate::runner::CommandSpec;
use crate::sanity::CapturedOutput;
use crate::select::skip_reason;

async fn execute(
    test: &BenchmarkTest,
    case: &mut TestCase,
    ctx: &RunContext<'_>,
) -> Result<CapturedOutput, PhaseFailure> {
    case.enter(Phase::Run, test.hooks()).in_phase(Phase::Run)?;

    let def = &case.definition;
    tracing::info!(
        target: "regcheck.engine",
        test = %def.name,
        command = %def.command_line(),
        "running"
    );
    let spec = CommandSpec::new(&def.executable, def.argv().to_vec())
        .cwd(Some(ctx.stage_dir(def)))
        .timeout(ctx.control.phase_timeout())
        .capture_bytes(ctx.control.capture_bytes);
    let out = ctx
        .runner
        .run(&spec)
        .await
        .map_err(CheckError::RunSpawn)
        .in_phase(Phase::Run)?;

    tracing::debug!(
        target: "regcheck.engine",
        test = %def.name,
        exit_code = out.exit_code,
        duration_ms = out.duration.as_millis() as u64,
        "run finished"
    );
    if let Some(sig) = out.signal {
        return Err(PhaseFailure::new(
            Phase::Run,
            CheckError::Run {
                reason: format!("terminated by signal {sig}"),
            },
        ));
    }
    if out.exit_code != 0 && ctx.control.fail_on_nonzero_exit {
        return Err(PhaseFailure::new(
            Phase::Run,
            CheckError::Run {
                reason: format!("exited with code {}", out.exit_code),
            },
        ));
    }

    case.leave(Phase::Run, test.hooks()).in_phase(Phase::Run)?;
    Ok(out.captured)
}

async fn pipeline(
    test: &BenchmarkTest,
    case: &mut TestCase,
    ctx: &RunContext<'_>,
    metrics: &mut Vec<MetricOutcome>,
) -> Result<(), PhaseFailure> {
    configure(test, case)?;
    build(test, case, ctx).await?;
    let output = execute(test, case, ctx).await?;
    evaluate_output(test, case, &output, ctx.control, metrics)?;
    case.enter(Phase::Report, test.hooks()).in_phase(Phase::Report)?;
    case.leave(Phase::Report, test.hooks()).in_phase(Phase::Report)
}

/// Run one test on a system/environment pair. Never errors: every failure
/// ends up in the returned report.
pub async fn run_test(
    test: &BenchmarkTest,
    system: &str,
    environ: &str,
    ctx: &RunContext<'_>,
) -> TestReport {
    let started = Instant::now();
    let mut report = TestReport::new(ctx.run_id, test.name(), system, environ);

    match skip_reason(test, system, environ) {
        Ok(Some(reason)) => {
            tracing::info!(target: "regcheck.engine", test = %test.name(), %reason, "skipping");
            report.verdict = Verdict::Skipped;
            report.message = Some(reason);
        }
        Ok(None) => {
            let mut case = test.instantiate(system, environ);
            write_event(
                ctx.events_out,
                &LifecycleEvent::new("test.start")
                    .run_id(ctx.run_id)
                    .test(test.name())
                    .data(serde_json::json!({ "system": system, "environ": environ })),
            )
            .await;
            if let Err(f) = pipeline(test, &mut case, ctx, &mut report.metrics).await {
                tracing::warn!(
                    target: "regcheck.engine",
                    test = %test.name(),
                    phase = %f.phase,
                    error = %f.error,
                    "test failed"
                );
                report.verdict = Verdict::Failed;
                report.failed_phase = Some(f.phase);
                report.message = Some(describe(&f.error));
            }
        }
        Err(e) => {
            report.verdict = Verdict::Failed;
            report.failed_phase = Some(Phase::Configure);
            report.message = Some(e.to_string());
        }
    }

    report.duration_ms = started.elapsed().as_millis() as u64;
    write_event(
        ctx.events_out,
        &LifecycleEvent::new("test.result")
            .run_id(ctx.run_id)
            .test(test.name())
            .data(serde_json::to_value(&report).unwrap_or(serde_json::Value::Null)),
    )
    .await;
    report
}

fn describe(err: &CheckError) -> String {
    match err {
        CheckError::Build { stderr_tail, .. } if !stderr_tail.is_empty() => {
            format!("{err}\n{stderr_tail}")
        }
        CheckError::BuildSpawn { source, .. } => format!("{err}: {source}"),
        CheckError::RunSpawn(source) => format!("{err}: {source}"),
        _ => err.to_string(),
    }
}
