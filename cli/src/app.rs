use std::path::{Path, PathBuf};

use regcheck_core::api::{load_from, AppConfig, BenchmarkTest, CliError};

/// Configuration and the full test catalogue, ready for a command.
pub struct Loaded {
    pub cfg: AppConfig,
    pub tests: Vec<BenchmarkTest>,
}

impl Loaded {
    pub fn find(&self, name: &str) -> Result<&BenchmarkTest, CliError> {
        self.tests
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| CliError::Command(format!("unknown test `{name}`")))
    }

    pub fn workdir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.cfg.harness.workdir).as_ref())
    }
}

pub fn load(config: Option<&Path>) -> Result<Loaded, CliError> {
    let cfg = load_from(config)?;
    let tests = regcheck_plugins::build_tests(&cfg)
        .map_err(|e| CliError::Command(format!("{e:#}")))?;
    for t in &tests {
        t.validate()?;
    }
    tracing::debug!(
        target: "regcheck.cli",
        tests = tests.len(),
        system = %cfg.harness.system,
        environ = %cfg.harness.environ,
        "loaded tests"
    );
    Ok(Loaded { cfg, tests })
}
