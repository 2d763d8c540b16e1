mod check_error;
mod cli_error;
mod config_error;
mod extract_error;
mod runner_error;

pub use check_error::{CheckError, HookError, SanityError};
pub use cli_error::CliError;
pub use config_error::ConfigError;
pub use extract_error::{DefinitionError, ExtractError};
pub use runner_error::RunnerError;
