// core/src/error/runner_error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn process: {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("io error while streaming: {stream}")]
    StreamIo {
        stream: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("process wait failed: {program}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("process timed out after {timeout_ms}ms: {program}")]
    Timeout { program: String, timeout_ms: u64 },
}
