use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CheckError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Configure,
    Build,
    Run,
    Sanity,
    Performance,
    Report,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Configure,
        Phase::Build,
        Phase::Run,
        Phase::Sanity,
        Phase::Performance,
        Phase::Report,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Configure => "configure",
            Phase::Build => "build",
            Phase::Run => "run",
            Phase::Sanity => "sanity",
            Phase::Performance => "performance",
            Phase::Report => "report",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the phase a test case is in. Phases only move forward, so a phase
/// (and the hooks attached to it) can never run twice for the same case.
#[derive(Debug, Clone, Default)]
pub struct PhaseTracker {
    current: Option<Phase>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Phase> {
        self.current
    }

    pub fn advance(&mut self, next: Phase) -> Result<(), CheckError> {
        match self.current {
            Some(current) if next <= current => Err(CheckError::InvalidState { current, next }),
            _ => {
                self.current = Some(next);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_ordered() {
        let mut sorted = Phase::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, Phase::ALL.to_vec());
    }

    #[test]
    fn tracker_moves_forward_and_may_skip() {
        let mut t = PhaseTracker::new();
        t.advance(Phase::Configure).unwrap();
        t.advance(Phase::Sanity).unwrap();
        assert_eq!(t.current(), Some(Phase::Sanity));
    }

    #[test]
    fn tracker_rejects_reentry() {
        let mut t = PhaseTracker::new();
        t.advance(Phase::Run).unwrap();
        let err = t.advance(Phase::Run).unwrap_err();
        assert!(matches!(
            err,
            CheckError::InvalidState {
                current: Phase::Run,
                next: Phase::Run
            }
        ));
        assert!(t.advance(Phase::Build).is_err());
    }
}
