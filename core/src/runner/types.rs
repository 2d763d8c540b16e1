use std::path::PathBuf;
use std::time::Duration;

use crate::sanity::CapturedOutput;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    pub capture_bytes: usize,
}

impl CommandSpec {
    pub fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
            cwd: None,
            env: Vec::new(),
            timeout: None,
            capture_bytes: 1024 * 1024,
        }
    }

    /// A command line interpreted by the platform shell.
    pub fn shell(command: &str) -> Self {
        #[cfg(windows)]
        {
            Self::new("cmd", vec!["/C".to_string(), command.to_string()])
        }
        #[cfg(not(windows))]
        {
            Self::new("sh", vec!["-c".to_string(), command.to_string()])
        }
    }

    pub fn cwd(mut self, cwd: Option<PathBuf>) -> Self {
        self.cwd = cwd;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn capture_bytes(mut self, capture_bytes: usize) -> Self {
        self.capture_bytes = capture_bytes;
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }
}

#[derive(Clone, Debug)]
pub struct ProcessOutput {
    /// Normalized: process exit code, or `128 + signal`.
    pub exit_code: i32,
    pub signal: Option<i32>,
    pub captured: CapturedOutput,
    pub duration: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0 && self.signal.is_none()
    }
}
