use std::path::{Path, PathBuf};

use crate::config::ControlConfig;
use crate::definition::{Phase, TestDefinition};
use crate::error::CheckError;
use crate::events_out::EventsOutTx;
use crate::runner::ProcessRunner;

/// Everything the engine needs besides the test itself.
pub struct RunContext<'a> {
    pub runner: &'a dyn ProcessRunner,
    pub control: &'a ControlConfig,
    pub workdir: &'a Path,
    pub run_id: &'a str,
    pub events_out: Option<&'a EventsOutTx>,
}

impl RunContext<'_> {
    /// Directory a test builds and runs in.
    pub fn stage_dir(&self, def: &TestDefinition) -> PathBuf {
        match &def.sourcesdir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.workdir.join(dir),
            None => self.workdir.to_path_buf(),
        }
    }
}

/// The phase a test stopped in, and why.
#[derive(Debug)]
pub struct PhaseFailure {
    pub phase: Phase,
    pub error: CheckError,
}

impl PhaseFailure {
    pub fn new(phase: Phase, error: CheckError) -> Self {
        Self { phase, error }
    }
}

pub(crate) trait InPhase<T> {
    fn in_phase(self, phase: Phase) -> Result<T, PhaseFailure>;
}

impl<T> InPhase<T> for Result<T, CheckError> {
    fn in_phase(self, phase: Phase) -> Result<T, PhaseFailure> {
        self.map_err(|e| PhaseFailure::new(phase, e))
    }
}
