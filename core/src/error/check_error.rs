// core/src/error/check_error.rs
use thiserror::Error;

use super::RunnerError;
use crate::definition::Phase;

/// Failure of a single pipeline phase. Every variant is terminal for the test.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("build command failed: `{command}` (exit code {exit_code})")]
    Build {
        command: String,
        exit_code: i32,
        stderr_tail: String,
    },

    #[error("build command could not be executed: `{command}`")]
    BuildSpawn {
        command: String,
        #[source]
        source: RunnerError,
    },

    #[error("run failed: {reason}")]
    Run { reason: String },

    #[error("run could not be started")]
    RunSpawn(#[source] RunnerError),

    #[error("sanity check failed: {0}")]
    Sanity(#[from] SanityError),

    #[error("performance extraction failed for {}", .failed.join(", "))]
    Performance { failed: Vec<String> },

    #[error("hook `{hook}` failed: {source}")]
    Hook {
        hook: String,
        #[source]
        source: HookError,
    },

    #[error("invalid state: cannot enter {next} after {current}")]
    InvalidState { current: Phase, next: Phase },
}

#[derive(Debug, Error)]
pub enum SanityError {
    #[error("pattern `{pattern}` not found in {stream}")]
    NotFound { pattern: String, stream: String },

    #[error("pattern `{pattern}` unexpectedly found in {stream}")]
    UnexpectedlyFound { pattern: String, stream: String },
}

#[derive(Debug, Error)]
pub enum HookError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HookError {
    pub fn msg(message: impl Into<String>) -> Self {
        HookError::Message(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanity_errors_name_pattern_and_stream() {
        let errors = [
            SanityError::NotFound {
                pattern: "Solution Validates".into(),
                stream: "stdout".into(),
            },
            SanityError::UnexpectedlyFound {
                pattern: "ERROR".into(),
                stream: "stderr".into(),
            },
        ];
        let messages: Vec<String> = errors
            .iter()
            .map(|e| match e {
                SanityError::NotFound { .. } | SanityError::UnexpectedlyFound { .. } => {
                    e.to_string()
                }
            })
            .collect();
        assert_eq!(
            messages,
            vec![
                "pattern `Solution Validates` not found in stdout",
                "pattern `ERROR` unexpectedly found in stderr",
            ]
        );
    }
}
