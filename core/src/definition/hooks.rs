use std::fmt;
use std::sync::Arc;

use super::{Phase, TestDefinition};
use crate::error::{CheckError, HookError};

pub type HookFn = Arc<dyn Fn(&mut TestDefinition) -> Result<(), HookError> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookWhen {
    Before,
    After,
}

impl HookWhen {
    pub fn as_str(self) -> &'static str {
        match self {
            HookWhen::Before => "before",
            HookWhen::After => "after",
        }
    }
}

#[derive(Clone)]
pub struct Hook {
    pub name: String,
    pub when: HookWhen,
    pub phase: Phase,
    f: HookFn,
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("name", &self.name)
            .field("when", &self.when)
            .field("phase", &self.phase)
            .finish()
    }
}

/// Ordered per-phase callbacks. Hooks run in registration order.
#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
    hooks: Vec<Hook>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_before<F>(&mut self, phase: Phase, name: &str, f: F)
    where
        F: Fn(&mut TestDefinition) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.push(HookWhen::Before, phase, name, Arc::new(f));
    }

    pub fn run_after<F>(&mut self, phase: Phase, name: &str, f: F)
    where
        F: Fn(&mut TestDefinition) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.push(HookWhen::After, phase, name, Arc::new(f));
    }

    fn push(&mut self, when: HookWhen, phase: Phase, name: &str, f: HookFn) {
        self.hooks.push(Hook {
            name: name.to_string(),
            when,
            phase,
            f,
        });
    }

    pub fn names(&self, when: HookWhen, phase: Phase) -> Vec<&str> {
        self.matching(when, phase).map(|h| h.name.as_str()).collect()
    }

    /// All hooks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Hook> {
        self.hooks.iter()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Invoke every hook registered for `(when, phase)`. Stops at the first failure.
    pub fn invoke(
        &self,
        when: HookWhen,
        phase: Phase,
        def: &mut TestDefinition,
    ) -> Result<(), CheckError> {
        for hook in self.matching(when, phase) {
            tracing::debug!(
                target: "regcheck.engine",
                test = %def.name,
                hook = %hook.name,
                phase = %phase,
                "invoking hook"
            );
            (hook.f)(def).map_err(|source| CheckError::Hook {
                hook: hook.name.clone(),
                source,
            })?;
        }
        Ok(())
    }

    fn matching(&self, when: HookWhen, phase: Phase) -> impl Iterator<Item = &Hook> {
        self.hooks
            .iter()
            .filter(move |h| h.when == when && h.phase == phase)
    }
}
