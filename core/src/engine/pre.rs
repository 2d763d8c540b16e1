use super::types::{InPhase, PhaseFailure, RunContext};
use crate::definition::{BenchmarkTest, Phase, TestCase};
use crate::error::CheckError;
use crate::runner::CommandSpec;

const STDERR_TAIL_LINES: usize = 20;

pub(crate) fn tail_lines(s: &str, n: usize) -> String {
    let lines: Vec<&str> = s.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

pub(crate) fn configure(test: &BenchmarkTest, case: &mut TestCase) -> Result<(), PhaseFailure> {
    case.enter(Phase::Configure, test.hooks()).in_phase(Phase::Configure)?;
    case.leave(Phase::Configure, test.hooks()).in_phase(Phase::Configure)
}

/// Run the build commands in order. The first failure ends the phase.
pub(crate) async fn build(
    test: &BenchmarkTest,
    case: &mut TestCase,
    ctx: &RunContext<'_>,
) -> Result<(), PhaseFailure> {
    case.enter(Phase::Build, test.hooks()).in_phase(Phase::Build)?;

    let dir = ctx.stage_dir(&case.definition);
    for command in case.definition.build_commands.clone() {
        tracing::info!(
            target: "regcheck.engine",
            test = %case.definition.name,
            command = %command,
            "build command"
        );
        let spec = CommandSpec::shell(&command)
            .cwd(Some(dir.clone()))
            .timeout(ctx.control.phase_timeout())
            .capture_bytes(ctx.control.capture_bytes);
        let out = ctx
            .runner
            .run(&spec)
            .await
            .map_err(|source| CheckError::BuildSpawn {
                command: command.clone(),
                source,
            })
            .in_phase(Phase::Build)?;
        if !out.success() {
            return Err(PhaseFailure::new(
                Phase::Build,
                CheckError::Build {
                    command,
                    exit_code: out.exit_code,
                    stderr_tail: tail_lines(&out.captured.stderr, STDERR_TAIL_LINES),
                },
            ));
        }
    }

    case.leave(Phase::Build, test.hooks()).in_phase(Phase::Build)
}
