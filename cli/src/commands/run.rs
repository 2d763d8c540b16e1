use regcheck_core::api::{
    run_session, start_events_out, AppConfig, CliError, RunContext, Selector, TokioProcessRunner,
};

use super::cli::RunArgs;
use super::print_session;
use crate::app::Loaded;

/// Command-line flags win over the file and `REGCHECK_*` values already in `cfg`.
pub fn apply_run_overrides(cfg: &mut AppConfig, args: &RunArgs) {
    if let Some(system) = &args.target.system {
        cfg.harness.system = system.clone();
    }
    if let Some(environ) = &args.target.environ {
        cfg.harness.environ = environ.clone();
    }
    if let Some(workdir) = &args.workdir {
        cfg.harness.workdir = workdir.clone();
    }
    if let Some(path) = &args.events {
        cfg.events_out.enabled = true;
        cfg.events_out.path = path.clone();
    }
}

pub async fn run(mut loaded: Loaded, args: RunArgs) -> Result<i32, CliError> {
    apply_run_overrides(&mut loaded.cfg, &args);

    let selector = Selector {
        names: args.select.names,
        tags: args.select.tags,
    };
    let selected = selector.select(&loaded.tests);
    if selected.is_empty() {
        return Err(CliError::Command("no tests selected".to_string()));
    }

    let run_id = uuid::Uuid::new_v4().to_string();
    let workdir = loaded.workdir();
    let events = start_events_out(&loaded.cfg.events_out)
        .await
        .map_err(CliError::EventsOut)?;
    let runner = TokioProcessRunner::new();
    tracing::info!(
        target: "regcheck.cli",
        %run_id,
        tests = selected.len(),
        system = %loaded.cfg.harness.system,
        environ = %loaded.cfg.harness.environ,
        workdir = %workdir.display(),
        "starting session"
    );

    let ctx = RunContext {
        runner: &runner,
        control: &loaded.cfg.control,
        workdir: &workdir,
        run_id: &run_id,
        events_out: events.as_ref().map(|(tx, _)| tx),
    };
    let report = run_session(
        &selected,
        &loaded.cfg.harness.system,
        &loaded.cfg.harness.environ,
        &ctx,
    )
    .await;

    if let Some((tx, handle)) = events {
        let dropped = tx.dropped_count();
        if dropped > 0 {
            tracing::warn!(target: "regcheck.cli", dropped, "some events were dropped");
        }
        handle.finish(tx).await;
    }

    print_session(&report, args.target.format);
    Ok(report.exit_code())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use regcheck_core::api::load_from;
    use regcheck_core::config::apply_env_overrides;

    use super::*;
    use crate::commands::cli::{OutputFormat, SelectArgs, TargetArgs};

    fn run_args(system: Option<&str>, events: Option<&str>) -> RunArgs {
        RunArgs {
            select: SelectArgs::default(),
            target: TargetArgs {
                system: system.map(str::to_string),
                environ: None,
                format: OutputFormat::Text,
            },
            workdir: None,
            events: events.map(str::to_string),
        }
    }

    fn file_config() -> AppConfig {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(
            b"[harness]\nsystem = \"file-sys\"\nenviron = \"file-env\"\nworkdir = \"/file/dir\"\n",
        )
        .unwrap();
        load_from(Some(f.path())).unwrap()
    }

    #[test]
    fn flags_beat_environment_which_beats_the_file() {
        let mut cfg = file_config();
        apply_env_overrides(&mut cfg, |k| match k {
            "REGCHECK_SYSTEM" => Some("env-sys".to_string()),
            "REGCHECK_ENVIRON" => Some("env-env".to_string()),
            _ => None,
        })
        .unwrap();
        apply_run_overrides(&mut cfg, &run_args(Some("cli-sys"), None));

        assert_eq!(cfg.harness.system, "cli-sys");
        assert_eq!(cfg.harness.environ, "env-env");
        assert_eq!(cfg.harness.workdir, "/file/dir");
        assert!(!cfg.events_out.enabled);
    }

    #[test]
    fn events_flag_enables_the_writer() {
        let mut cfg = file_config();
        apply_run_overrides(&mut cfg, &run_args(None, Some("stdout:")));
        assert!(cfg.events_out.enabled);
        assert_eq!(cfg.events_out.path, "stdout:");
        assert_eq!(cfg.harness.system, "file-sys");
    }
}
