//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `regcheck_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load_default, load_from, AppConfig, ControlConfig, EventsOutConfig, HarnessConfig,
    MissingMetricPolicy, PerfSpec, SanitySpec, TestKind, TestSpecConfig,
};
pub use crate::definition::{BenchmarkTest, HookRegistry, Phase, TestCase, TestDefinition};
pub use crate::engine::{check_output, run_session, run_test, RunContext};
pub use crate::error::{
    CheckError, CliError, ConfigError, DefinitionError, ExtractError, HookError, RunnerError,
    SanityError,
};
pub use crate::events_out::{start_events_out, EventsOutHandle, EventsOutTx};
pub use crate::report::{format_text, to_json, MetricOutcome, SessionReport, TestReport, Verdict};
pub use crate::runner::{CommandSpec, ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use crate::sanity::{
    assert_found, assert_not_found, extract_all, extract_single, CapturedOutput, Expect,
    MetricResult, Pattern, PerformanceFunction, SanityCheck, Stream,
};
pub use crate::select::{skip_reason, Selector};
