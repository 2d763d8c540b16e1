use anyhow::{bail, Context, Result};

use regcheck_core::api::{AppConfig, BenchmarkTest};

use crate::declared::from_spec;
use crate::saxpy::saxpy_test;

pub fn builtin_tests() -> Vec<BenchmarkTest> {
    vec![saxpy_test()]
}

/// Built-in tests followed by the ones declared in `cfg`, in declaration order.
pub fn build_tests(cfg: &AppConfig) -> Result<Vec<BenchmarkTest>> {
    let mut tests = builtin_tests();
    for spec in &cfg.tests {
        if tests.iter().any(|t| t.name() == spec.name) {
            bail!("test `{}` is already defined", spec.name);
        }
        let test = from_spec(spec).with_context(|| format!("declared test `{}`", spec.name))?;
        tracing::debug!(target: "regcheck.plugins", test = %spec.name, "loaded declared test");
        tests.push(test);
    }
    Ok(tests)
}

#[cfg(test)]
mod tests {
    use regcheck_core::api::TestSpecConfig;

    use super::*;

    fn declared(name: &str) -> TestSpecConfig {
        TestSpecConfig {
            name: name.into(),
            kind: Default::default(),
            executable: None,
            executable_opts: None,
            script: "x.jl".into(),
            script_opts: vec![],
            build_commands: vec![],
            sourcesdir: None,
            tags: vec![],
            valid_systems: vec!["*".into()],
            valid_environments: vec!["*".into()],
            sanity: vec![regcheck_core::api::SanitySpec {
                pattern: "ok".into(),
                stream: Default::default(),
                expect: Default::default(),
            }],
            perf: vec![],
        }
    }

    #[test]
    fn builtins_come_first() {
        let cfg = AppConfig {
            tests: vec![declared("extra_test")],
            ..AppConfig::default()
        };
        let names: Vec<String> = build_tests(&cfg)
            .unwrap()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, vec!["saxpy_test", "extra_test"]);
    }

    #[test]
    fn declared_test_cannot_shadow_a_builtin() {
        let cfg = AppConfig {
            tests: vec![declared("saxpy_test")],
            ..AppConfig::default()
        };
        let err = build_tests(&cfg).unwrap_err();
        assert_eq!(err.to_string(), "test `saxpy_test` is already defined");
    }
}
