use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use super::{HookRegistry, HookWhen, Phase, PhaseTracker};
use crate::error::{CheckError, DefinitionError};
use crate::sanity::{PerformanceFunction, SanityCheck};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TestDefinition {
    pub name: String,
    pub executable: String,
    pub executable_opts: Vec<String>,
    pub build_commands: Vec<String>,
    pub tags: BTreeSet<String>,
    pub valid_systems: Vec<String>,
    pub valid_environments: Vec<String>,
    pub script_name: String,
    pub script_options: Vec<String>,
    /// Directory the build commands and the program run in, relative to the
    /// harness workdir unless absolute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcesdir: Option<PathBuf>,
}

impl TestDefinition {
    pub fn new(name: &str, executable: &str) -> Self {
        Self {
            name: name.to_string(),
            executable: executable.to_string(),
            executable_opts: Vec::new(),
            build_commands: Vec::new(),
            tags: BTreeSet::new(),
            valid_systems: Vec::new(),
            valid_environments: Vec::new(),
            script_name: String::new(),
            script_options: Vec::new(),
            sourcesdir: None,
        }
    }

    /// The argv passed to the executable.
    pub fn argv(&self) -> &[String] {
        &self.executable_opts
    }

    /// Shell-style rendering of the run command, for display only.
    pub fn command_line(&self) -> String {
        let mut parts = Vec::with_capacity(self.executable_opts.len() + 1);
        parts.push(self.executable.clone());
        parts.extend(self.executable_opts.iter().cloned());
        parts.join(" ")
    }
}

/// A test template: definition plus hooks, sanity checks and performance functions.
#[derive(Debug, Clone)]
pub struct BenchmarkTest {
    definition: TestDefinition,
    hooks: HookRegistry,
    sanity: Vec<SanityCheck>,
    perf: Vec<PerformanceFunction>,
}

impl BenchmarkTest {
    pub fn new(definition: TestDefinition) -> Self {
        Self {
            definition,
            hooks: HookRegistry::new(),
            sanity: Vec::new(),
            perf: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn definition(&self) -> &TestDefinition {
        &self.definition
    }

    pub fn definition_mut(&mut self) -> &mut TestDefinition {
        &mut self.definition
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    pub fn sanity_checks(&self) -> &[SanityCheck] {
        &self.sanity
    }

    pub fn performance_functions(&self) -> &[PerformanceFunction] {
        &self.perf
    }

    pub fn with_sanity(mut self, check: SanityCheck) -> Self {
        self.sanity.push(check);
        self
    }

    pub fn with_performance(mut self, f: PerformanceFunction) -> Self {
        self.perf.push(f);
        self
    }

    pub fn has_tags(&self, tags: &[String]) -> bool {
        tags.iter().all(|t| self.definition.tags.contains(t))
    }

    pub fn validate(&self) -> Result<(), DefinitionError> {
        let invalid = |reason: &str| DefinitionError::Invalid {
            test: self.definition.name.clone(),
            reason: reason.to_string(),
        };
        if self.definition.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if self.definition.executable.trim().is_empty() {
            return Err(invalid("executable is empty"));
        }
        if self.sanity.is_empty() {
            return Err(invalid("no sanity check defined"));
        }
        let mut seen = BTreeSet::new();
        for f in &self.perf {
            if !seen.insert(f.name.as_str()) {
                return Err(invalid(&format!("duplicate performance function `{}`", f.name)));
            }
        }
        Ok(())
    }

    pub fn instantiate(&self, system: &str, environ: &str) -> TestCase {
        TestCase {
            definition: self.definition.clone(),
            tracker: PhaseTracker::new(),
            system: system.to_string(),
            environ: environ.to_string(),
        }
    }
}

/// One execution of a [`BenchmarkTest`] on a system/environment pair.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub definition: TestDefinition,
    tracker: PhaseTracker,
    pub system: String,
    pub environ: String,
}

impl TestCase {
    pub fn phase(&self) -> Option<Phase> {
        self.tracker.current()
    }

    /// Move into `phase` and run its before-hooks.
    pub fn enter(&mut self, phase: Phase, hooks: &HookRegistry) -> Result<(), CheckError> {
        self.tracker.advance(phase)?;
        hooks.invoke(HookWhen::Before, phase, &mut self.definition)
    }

    pub fn leave(&mut self, phase: Phase, hooks: &HookRegistry) -> Result<(), CheckError> {
        hooks.invoke(HookWhen::After, phase, &mut self.definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanity::{Pattern, SanityCheck};

    fn sample() -> BenchmarkTest {
        let mut def = TestDefinition::new("sample", "prog");
        def.tags.insert("bw".into());
        def.tags.insert("julia".into());
        BenchmarkTest::new(def).with_sanity(SanityCheck::found(Pattern::new("OK").unwrap()))
    }

    #[test]
    fn instances_do_not_share_mutations() {
        let mut test = sample();
        test.hooks_mut().run_before(Phase::Run, "append", |d| {
            d.executable_opts.push("x".into());
            Ok(())
        });

        let mut a = test.instantiate("sys", "env");
        a.enter(Phase::Run, test.hooks()).unwrap();
        let b = test.instantiate("sys", "env");

        assert_eq!(a.definition.executable_opts, vec!["x"]);
        assert!(b.definition.executable_opts.is_empty());
        assert!(test.definition().executable_opts.is_empty());
    }

    #[test]
    fn entering_a_phase_twice_is_rejected() {
        let test = sample();
        let mut case = test.instantiate("sys", "env");
        case.enter(Phase::Build, test.hooks()).unwrap();
        assert!(case.enter(Phase::Build, test.hooks()).is_err());
    }

    #[test]
    fn tag_filter_requires_all_tags() {
        let test = sample();
        assert!(test.has_tags(&["julia".into()]));
        assert!(test.has_tags(&["julia".into(), "bw".into()]));
        assert!(!test.has_tags(&["julia".into(), "gpu".into()]));
        assert!(test.has_tags(&[]));
    }

    #[test]
    fn validate_rejects_missing_sanity() {
        let test = BenchmarkTest::new(TestDefinition::new("bare", "prog"));
        let err = test.validate().unwrap_err();
        assert_eq!(err.to_string(), "test `bare`: no sanity check defined");
    }

    #[test]
    fn command_line_joins_executable_and_opts() {
        let mut def = TestDefinition::new("t", "julia");
        def.executable_opts = vec!["--project=.".into(), "saxpy.jl".into()];
        assert_eq!(def.command_line(), "julia --project=. saxpy.jl");
    }
}
