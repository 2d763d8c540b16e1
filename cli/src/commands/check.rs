use std::path::Path;

use regcheck_core::api::{check_output, CapturedOutput, CliError, SessionReport};

use super::cli::CheckArgs;
use super::print_session;
use crate::app::Loaded;

fn read_capture(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::Command(format!("cannot read {}: {e}", path.display())))
}

pub fn check(loaded: &Loaded, args: CheckArgs) -> Result<i32, CliError> {
    let test = loaded.find(&args.name)?;
    let stdout = read_capture(&args.stdout)?;
    let stderr = match &args.stderr {
        Some(path) => read_capture(path)?,
        None => String::new(),
    };

    let system = args
        .target
        .system
        .unwrap_or_else(|| loaded.cfg.harness.system.clone());
    let environ = args
        .target
        .environ
        .unwrap_or_else(|| loaded.cfg.harness.environ.clone());
    let run_id = uuid::Uuid::new_v4().to_string();

    let report = check_output(
        test,
        &CapturedOutput::new(stdout, stderr),
        &loaded.cfg.control,
        &run_id,
        &system,
        &environ,
    );
    let mut session = SessionReport::new(&run_id, &system, &environ);
    session.tests.push(report);

    print_session(&session, args.target.format);
    Ok(session.exit_code())
}
