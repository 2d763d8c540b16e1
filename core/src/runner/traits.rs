use async_trait::async_trait;

use super::{CommandSpec, ProcessOutput};
use crate::error::RunnerError;

/// Launches a program and waits for it, capturing its output.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput, RunnerError>;
}
