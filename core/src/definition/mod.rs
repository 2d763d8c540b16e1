//! Declarative regression-test definitions.
//!
//! A [`BenchmarkTest`] is a template: the definition, its phase hooks and the
//! functions that interpret program output. Each execution works on a fresh
//! [`TestCase`] so hooks that mutate the definition never leak between runs.

mod hooks;
mod phase;
mod types;

pub use hooks::{Hook, HookFn, HookRegistry, HookWhen};
pub use phase::{Phase, PhaseTracker};
pub use types::{BenchmarkTest, TestCase, TestDefinition};
