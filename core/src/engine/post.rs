use super::types::{InPhase, PhaseFailure};
use crate::config::{ControlConfig, MissingMetricPolicy};
use crate::definition::{BenchmarkTest, Phase, TestCase};
use crate::error::CheckError;
use crate::report::{MetricOutcome, TestReport, Verdict};
use crate::sanity::CapturedOutput;

/// Sanity then performance over captured output.
///
/// Every performance function is attempted even when an earlier one fails.
/// The sanity verdict wins over a performance failure when both occur.
pub(crate) fn evaluate_output(
    test: &BenchmarkTest,
    case: &mut TestCase,
    output: &CapturedOutput,
    control: &ControlConfig,
    metrics: &mut Vec<MetricOutcome>,
) -> Result<(), PhaseFailure> {
    case.enter(Phase::Sanity, test.hooks()).in_phase(Phase::Sanity)?;
    let sanity = test
        .sanity_checks()
        .iter()
        .try_for_each(|check| check.evaluate(output))
        .map_err(|e| PhaseFailure::new(Phase::Sanity, CheckError::Sanity(e)));
    let sanity_failure = match sanity {
        Ok(()) => {
            case.leave(Phase::Sanity, test.hooks()).in_phase(Phase::Sanity)?;
            None
        }
        Err(f) => {
            tracing::info!(
                target: "regcheck.engine",
                test = %case.definition.name,
                error = %f.error,
                "sanity failed"
            );
            if !control.extract_on_sanity_failure {
                return Err(f);
            }
            Some(f)
        }
    };

    case.enter(Phase::Performance, test.hooks()).in_phase(Phase::Performance)?;
    let mut failed = Vec::new();
    for f in test.performance_functions() {
        let outcome = MetricOutcome::from_result(f, f.evaluate(output));
        if let Some(err) = &outcome.error {
            tracing::warn!(
                target: "regcheck.engine",
                test = %case.definition.name,
                metric = %f.name,
                error = %err,
                "metric extraction failed"
            );
            failed.push(f.name.clone());
        }
        metrics.push(outcome);
    }
    if let Some(f) = sanity_failure {
        return Err(f);
    }

    if !failed.is_empty() && control.missing_metric == MissingMetricPolicy::Fail {
        return Err(PhaseFailure::new(
            Phase::Performance,
            CheckError::Performance { failed },
        ));
    }
    case.leave(Phase::Performance, test.hooks()).in_phase(Phase::Performance)
}

/// Evaluate a test against output captured elsewhere, without building or running.
pub fn check_output(
    test: &BenchmarkTest,
    output: &CapturedOutput,
    control: &ControlConfig,
    run_id: &str,
    system: &str,
    environ: &str,
) -> TestReport {
    let started = std::time::Instant::now();
    let mut report = TestReport::new(run_id, test.name(), system, environ);
    let mut case = test.instantiate(system, environ);
    if let Err(f) = evaluate_output(test, &mut case, output, control, &mut report.metrics) {
        report.verdict = Verdict::Failed;
        report.failed_phase = Some(f.phase);
        report.message = Some(f.error.to_string());
    }
    report.duration_ms = started.elapsed().as_millis() as u64;
    report
}
