//! Which tests run where.

use glob::Pattern as Glob;

use crate::definition::BenchmarkTest;
use crate::error::DefinitionError;

fn glob(p: &str) -> Result<Glob, DefinitionError> {
    Glob::new(p).map_err(|source| DefinitionError::Glob {
        pattern: p.to_string(),
        source,
    })
}

/// Does any pattern accept `value`? A pattern without `:` also matches
/// `system:partition` values by their system part.
pub fn matches_any(patterns: &[String], value: &str) -> Result<bool, DefinitionError> {
    let base = value.split_once(':').map(|(s, _)| s).unwrap_or(value);
    for p in patterns {
        let g = glob(p)?;
        if g.matches(value) || (!p.contains(':') && g.matches(base)) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// `Some(reason)` when `test` must be skipped on this system/environment.
pub fn skip_reason(
    test: &BenchmarkTest,
    system: &str,
    environ: &str,
) -> Result<Option<String>, DefinitionError> {
    let def = test.definition();
    if !matches_any(&def.valid_systems, system)? {
        return Ok(Some(format!("not valid for system `{system}`")));
    }
    if !matches_any(&def.valid_environments, environ)? {
        return Ok(Some(format!("not valid for environment `{environ}`")));
    }
    Ok(None)
}

/// Name and tag filters from the command line.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    pub names: Vec<String>,
    pub tags: Vec<String>,
}

impl Selector {
    pub fn accepts(&self, test: &BenchmarkTest) -> bool {
        let name_ok = self.names.is_empty() || self.names.iter().any(|n| n == test.name());
        name_ok && test.has_tags(&self.tags)
    }

    pub fn select<'a>(&self, tests: &'a [BenchmarkTest]) -> Vec<&'a BenchmarkTest> {
        tests.iter().filter(|t| self.accepts(t)).collect()
    }
}
