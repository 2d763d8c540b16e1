use serde::{Deserialize, Serialize};

use crate::sanity::{Expect, Stream};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub harness: HarnessConfig,

    #[serde(default)]
    pub control: ControlConfig,

    #[serde(default)]
    pub events_out: EventsOutConfig,

    #[serde(default)]
    pub tests: Vec<TestSpecConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HarnessConfig {
    #[serde(default = "default_system")]
    pub system: String,

    #[serde(default = "default_environ")]
    pub environ: String,

    #[serde(default = "default_workdir")]
    pub workdir: String,
}

fn default_system() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "generic".to_string())
}

fn default_environ() -> String {
    "builtin".to_string()
}

fn default_workdir() -> String {
    ".".to_string()
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            system: default_system(),
            environ: default_environ(),
            workdir: default_workdir(),
        }
    }
}

/// What a metric whose pattern did not match does to the test verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingMetricPolicy {
    /// The test fails in the performance phase.
    #[default]
    Fail,
    /// The metric is reported as an error; the verdict is unaffected.
    Report,
}

impl std::str::FromStr for MissingMetricPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(MissingMetricPolicy::Fail),
            "report" => Ok(MissingMetricPolicy::Report),
            other => Err(format!("unknown missing-metric policy `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlConfig {
    #[serde(default = "default_capture_bytes")]
    pub capture_bytes: usize,

    /// 0 disables the timeout.
    #[serde(default)]
    pub phase_timeout_ms: u64,

    #[serde(default)]
    pub missing_metric: MissingMetricPolicy,

    #[serde(default)]
    pub extract_on_sanity_failure: bool,

    #[serde(default = "default_fail_on_nonzero_exit")]
    pub fail_on_nonzero_exit: bool,
}

fn default_capture_bytes() -> usize {
    1024 * 1024
}

fn default_fail_on_nonzero_exit() -> bool {
    true
}

impl ControlConfig {
    pub fn phase_timeout(&self) -> Option<std::time::Duration> {
        (self.phase_timeout_ms > 0).then(|| std::time::Duration::from_millis(self.phase_timeout_ms))
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            capture_bytes: default_capture_bytes(),
            phase_timeout_ms: 0,
            missing_metric: MissingMetricPolicy::default(),
            extract_on_sanity_failure: false,
            fail_on_nonzero_exit: default_fail_on_nonzero_exit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventsOutConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_events_path")]
    pub path: String,

    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    #[serde(default)]
    pub drop_when_full: bool,
}

fn default_events_path() -> String {
    "regcheck-events.jsonl".to_string()
}

fn default_channel_capacity() -> usize {
    1024
}

impl Default for EventsOutConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_events_path(),
            channel_capacity: default_channel_capacity(),
            drop_when_full: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    /// Julia project: Pkg resolve/instantiate build, `--project=. <script>` run.
    #[default]
    Julia,
    /// Arbitrary executable with explicit build commands.
    Generic,
}

/// A test declared in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestSpecConfig {
    pub name: String,

    #[serde(default)]
    pub kind: TestKind,

    #[serde(default)]
    pub executable: Option<String>,

    #[serde(default)]
    pub executable_opts: Option<Vec<String>>,

    #[serde(default)]
    pub script: String,

    #[serde(default)]
    pub script_opts: Vec<String>,

    #[serde(default)]
    pub build_commands: Vec<String>,

    #[serde(default)]
    pub sourcesdir: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default = "default_valid")]
    pub valid_systems: Vec<String>,

    #[serde(default = "default_valid")]
    pub valid_environments: Vec<String>,

    #[serde(default)]
    pub sanity: Vec<SanitySpec>,

    #[serde(default)]
    pub perf: Vec<PerfSpec>,
}

fn default_valid() -> Vec<String> {
    vec!["*".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SanitySpec {
    pub pattern: String,

    #[serde(default)]
    pub stream: Stream,

    #[serde(default)]
    pub expect: Expect,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerfSpec {
    pub name: String,
    pub pattern: String,

    #[serde(default = "default_group")]
    pub group: usize,

    #[serde(default)]
    pub unit: String,

    #[serde(default)]
    pub stream: Stream,
}

fn default_group() -> usize {
    1
}
