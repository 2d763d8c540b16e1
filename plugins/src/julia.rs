//! Base for tests that run a script inside a Julia project.
//!
//! The project's dependencies are resolved and instantiated before the run,
//! then the script and its options are appended to `--project=.`.

use regcheck_core::api::{BenchmarkTest, HookError, Phase, TestDefinition};

pub const JULIA_EXECUTABLE: &str = "julia";

pub const JULIA_BUILD_COMMANDS: [&str; 2] = [
    r#"julia --project=. -e "import Pkg; Pkg.resolve()""#,
    r#"julia --project=. -e "import Pkg; Pkg.instantiate()""#,
];

/// Replaces the build list with the Pkg resolve/instantiate pair.
pub fn setup_build(def: &mut TestDefinition) -> Result<(), HookError> {
    def.build_commands = JULIA_BUILD_COMMANDS.iter().map(|c| c.to_string()).collect();
    Ok(())
}

/// Appends the script name, then the script options, to the executable options.
pub fn set_executable_opts(def: &mut TestDefinition) -> Result<(), HookError> {
    if def.script_name.trim().is_empty() {
        return Err(HookError::msg(format!(
            "test `{}` does not name a julia script",
            def.name
        )));
    }
    def.executable_opts.push(def.script_name.clone());
    def.executable_opts.extend(def.script_options.iter().cloned());
    Ok(())
}

/// A Julia test with no sanity or performance functions yet, valid nowhere
/// until the caller sets `valid_systems` and `valid_environments`.
pub fn julia_test(name: &str, script: &str, script_options: Vec<String>) -> BenchmarkTest {
    let mut def = TestDefinition::new(name, JULIA_EXECUTABLE);
    def.executable_opts = vec!["--project=.".to_string()];
    def.tags.insert("julia".to_string());
    def.script_name = script.to_string();
    def.script_options = script_options;

    let mut test = BenchmarkTest::new(def);
    test.hooks_mut()
        .run_before(Phase::Build, "setup_build", setup_build);
    test.hooks_mut()
        .run_before(Phase::Run, "set_executable_opts", set_executable_opts);
    test
}
