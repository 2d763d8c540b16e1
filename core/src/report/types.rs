use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::definition::Phase;
use crate::error::ExtractError;
use crate::sanity::{MetricResult, PerformanceFunction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Passed,
    Failed,
    Skipped,
}

/// Outcome of one performance function: a value or the reason there is none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricOutcome {
    pub name: String,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetricOutcome {
    pub fn from_result(f: &PerformanceFunction, res: Result<MetricResult, ExtractError>) -> Self {
        match res {
            Ok(m) => Self {
                name: m.name,
                unit: m.unit,
                value: Some(m.value),
                error: None,
            },
            Err(e) => Self {
                name: f.name.clone(),
                unit: f.unit.clone(),
                value: None,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        self.value.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestReport {
    pub run_id: String,
    pub test: String,
    pub system: String,
    pub environ: String,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_phase: Option<Phase>,
    /// Failure or skip reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub metrics: Vec<MetricOutcome>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl TestReport {
    pub fn new(run_id: &str, test: &str, system: &str, environ: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            test: test.to_string(),
            system: system.to_string(),
            environ: environ.to_string(),
            verdict: Verdict::Passed,
            failed_phase: None,
            message: None,
            metrics: Vec::new(),
            started_at: Utc::now(),
            duration_ms: 0,
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Passed
    }

    pub fn metric(&self, name: &str) -> Option<&MetricOutcome> {
        self.metrics.iter().find(|m| m.name == name)
    }

    pub fn metric_value(&self, name: &str) -> Option<f64> {
        self.metric(name).and_then(|m| m.value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub run_id: String,
    pub system: String,
    pub environ: String,
    pub tests: Vec<TestReport>,
}

impl SessionReport {
    pub fn new(run_id: &str, system: &str, environ: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            system: system.to_string(),
            environ: environ.to_string(),
            tests: Vec::new(),
        }
    }

    pub fn totals(&self) -> Totals {
        let mut t = Totals {
            tests: self.tests.len(),
            ..Totals::default()
        };
        for r in &self.tests {
            match r.verdict {
                Verdict::Passed => t.passed += 1,
                Verdict::Failed => t.failed += 1,
                Verdict::Skipped => t.skipped += 1,
            }
        }
        t
    }

    /// True when nothing failed. Skips do not count as failures.
    pub fn all_passed(&self) -> bool {
        self.totals().failed == 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}
