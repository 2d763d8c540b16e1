// core/src/error/cli_error.rs
use thiserror::Error;

use super::{ConfigError, DefinitionError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error("{0}")]
    Command(String),

    #[error("events writer: {0}")]
    EventsOut(String),
}

impl CliError {
    /// Usage and configuration problems exit with 2; test failures use 1.
    pub fn exit_code(&self) -> i32 {
        2
    }
}
