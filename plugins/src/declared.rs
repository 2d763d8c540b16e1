//! Tests declared in the `[[tests]]` tables of the configuration file.

use std::path::PathBuf;

use regcheck_core::api::{
    BenchmarkTest, DefinitionError, HookError, Pattern, PerformanceFunction, Phase, SanityCheck,
    TestDefinition, TestKind, TestSpecConfig,
};

use crate::julia::julia_test;

fn invalid(spec: &TestSpecConfig, reason: &str) -> DefinitionError {
    DefinitionError::Invalid {
        test: spec.name.clone(),
        reason: reason.to_string(),
    }
}

/// Appends the script (when set) and its options; used by generic tests.
fn append_script(def: &mut TestDefinition) -> Result<(), HookError> {
    if !def.script_name.is_empty() {
        def.executable_opts.push(def.script_name.clone());
    }
    def.executable_opts.extend(def.script_options.iter().cloned());
    Ok(())
}

fn base(spec: &TestSpecConfig) -> Result<BenchmarkTest, DefinitionError> {
    match spec.kind {
        TestKind::Julia => {
            if !spec.build_commands.is_empty() {
                return Err(invalid(spec, "julia tests do not take build_commands"));
            }
            let mut test = julia_test(&spec.name, &spec.script, spec.script_opts.clone());
            let def = test.definition_mut();
            if let Some(exe) = &spec.executable {
                def.executable = exe.clone();
            }
            if let Some(opts) = &spec.executable_opts {
                def.executable_opts = opts.clone();
            }
            Ok(test)
        }
        TestKind::Generic => {
            let exe = spec
                .executable
                .as_deref()
                .ok_or_else(|| invalid(spec, "generic tests need an executable"))?;
            let mut def = TestDefinition::new(&spec.name, exe);
            def.executable_opts = spec.executable_opts.clone().unwrap_or_default();
            def.build_commands = spec.build_commands.clone();
            def.script_name = spec.script.clone();
            def.script_options = spec.script_opts.clone();
            let mut test = BenchmarkTest::new(def);
            test.hooks_mut()
                .run_before(Phase::Run, "append_script", append_script);
            Ok(test)
        }
    }
}

pub fn from_spec(spec: &TestSpecConfig) -> Result<BenchmarkTest, DefinitionError> {
    let mut test = base(spec)?;

    let def = test.definition_mut();
    def.tags.extend(spec.tags.iter().cloned());
    def.valid_systems = spec.valid_systems.clone();
    def.valid_environments = spec.valid_environments.clone();
    def.sourcesdir = spec
        .sourcesdir
        .as_deref()
        .map(|d| PathBuf::from(shellexpand::tilde(d).as_ref()));

    for s in &spec.sanity {
        let mut check = SanityCheck::found(Pattern::new(&s.pattern)?).on(s.stream);
        check.expect = s.expect;
        test = test.with_sanity(check);
    }
    for p in &spec.perf {
        let f = PerformanceFunction::parse(&p.name, &p.unit, &p.pattern)?
            .group(p.group)
            .on(p.stream);
        test = test.with_performance(f);
    }

    test.validate()?;
    Ok(test)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use regcheck_core::api::{Expect, PerfSpec, SanitySpec, Stream};
    use regcheck_core::definition::HookWhen;

    use super::*;

    fn spec(kind: TestKind) -> TestSpecConfig {
        TestSpecConfig {
            name: "triad_test".into(),
            kind,
            executable: None,
            executable_opts: None,
            script: "triad.jl".into(),
            script_opts: vec!["--n".into(), "10".into()],
            build_commands: vec![],
            sourcesdir: Some("src/triad".into()),
            tags: vec!["bandwidth".into()],
            valid_systems: vec!["*".into()],
            valid_environments: vec!["*".into()],
            sanity: vec![SanitySpec {
                pattern: "Solution Validates".into(),
                stream: Stream::Stdout,
                expect: Expect::Found,
            }],
            perf: vec![PerfSpec {
                name: "triad_bw".into(),
                pattern: r"Triad:\s+(\S+)".into(),
                group: 1,
                unit: "MB/s".into(),
                stream: Stream::Stdout,
            }],
        }
    }

    #[test]
    fn julia_spec_builds_on_the_julia_base() {
        let test = from_spec(&spec(TestKind::Julia)).unwrap();
        assert!(test.has_tags(&["julia".into(), "bandwidth".into()]));
        assert_eq!(
            test.definition().sourcesdir,
            Some(PathBuf::from("src/triad"))
        );

        let mut def = test.definition().clone();
        test.hooks()
            .invoke(HookWhen::Before, Phase::Build, &mut def)
            .unwrap();
        test.hooks()
            .invoke(HookWhen::Before, Phase::Run, &mut def)
            .unwrap();
        assert_eq!(def.build_commands.len(), 2);
        assert_eq!(
            def.command_line(),
            "julia --project=. triad.jl --n 10"
        );
        assert_eq!(test.performance_functions()[0].name, "triad_bw");
    }

    #[test]
    fn julia_spec_rejects_custom_build_commands() {
        let mut s = spec(TestKind::Julia);
        s.build_commands = vec!["make".into()];
        let err = from_spec(&s).unwrap_err();
        assert_eq!(
            err.to_string(),
            "test `triad_test`: julia tests do not take build_commands"
        );
    }

    #[test]
    fn generic_spec_keeps_its_build_commands() {
        let mut s = spec(TestKind::Generic);
        s.executable = Some("./stream".into());
        s.script = String::new();
        s.build_commands = vec!["make".into()];
        let test = from_spec(&s).unwrap();

        let mut def = test.definition().clone();
        test.hooks()
            .invoke(HookWhen::Before, Phase::Run, &mut def)
            .unwrap();
        assert_eq!(def.build_commands, vec!["make"]);
        assert_eq!(def.command_line(), "./stream --n 10");
    }

    #[test]
    fn generic_spec_needs_an_executable() {
        assert!(from_spec(&spec(TestKind::Generic)).is_err());
    }

    #[test]
    fn bad_regex_is_reported() {
        let mut s = spec(TestKind::Julia);
        s.perf[0].pattern = "Triad:(".into();
        assert!(matches!(
            from_spec(&s).unwrap_err(),
            DefinitionError::Regex { .. }
        ));
    }

    #[test]
    fn spec_without_sanity_is_invalid() {
        let mut s = spec(TestKind::Julia);
        s.sanity.clear();
        assert!(from_spec(&s).is_err());
    }
}
