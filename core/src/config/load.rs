use std::path::Path;

use super::types::AppConfig;
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "regcheck.toml";

/// Load `regcheck.toml` from the current directory if present, then apply env overrides.
pub fn load_default() -> Result<AppConfig, ConfigError> {
    load_from(None)
}

/// Load an explicit file (which must exist) or fall back to [`DEFAULT_CONFIG_FILE`].
pub fn load_from(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut cfg = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound(p.display().to_string()));
            }
            parse_file(p)?
        }
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => parse_file(Path::new(DEFAULT_CONFIG_FILE))?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut cfg, |k| std::env::var(k).ok())?;
    validate(&cfg)?;
    Ok(cfg)
}

fn parse_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse(e.into()))?;
    let cfg = toml::from_str::<AppConfig>(&s).map_err(|e| ConfigError::Parse(e.into()))?;
    tracing::debug!(
        target: "regcheck.config",
        path = %path.display(),
        tests = cfg.tests.len(),
        "loaded config file"
    );
    Ok(cfg)
}

/// Apply `REGCHECK_*` overrides. Empty values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("REGCHECK_SYSTEM") {
        cfg.harness.system = v;
    }
    if let Some(v) = get("REGCHECK_ENVIRON") {
        cfg.harness.environ = v;
    }
    if let Some(v) = get("REGCHECK_WORKDIR") {
        cfg.harness.workdir = v;
    }
    if let Some(v) = get("REGCHECK_MISSING_METRIC") {
        cfg.control.missing_metric = v.parse().map_err(|e: String| ConfigError::EnvInvalid {
            key: "REGCHECK_MISSING_METRIC".to_string(),
            source: anyhow::anyhow!(e),
        })?;
    }
    if let Some(v) = get("REGCHECK_EVENTS_PATH") {
        cfg.events_out.enabled = true;
        cfg.events_out.path = v;
    }
    Ok(())
}

fn validate(cfg: &AppConfig) -> Result<(), ConfigError> {
    if cfg.control.capture_bytes == 0 {
        return Err(ConfigError::Validation(
            "control.capture_bytes must be greater than 0".to_string(),
        ));
    }
    if cfg.events_out.enabled && cfg.events_out.channel_capacity == 0 {
        return Err(ConfigError::Validation(
            "events_out.channel_capacity must be greater than 0".to_string(),
        ));
    }
    let mut names = std::collections::HashSet::new();
    for t in &cfg.tests {
        if t.name.trim().is_empty() {
            return Err(ConfigError::Validation("test with empty name".to_string()));
        }
        if !names.insert(t.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate test name `{}`",
                t.name
            )));
        }
    }
    Ok(())
}
