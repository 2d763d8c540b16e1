use lazy_static::lazy_static;
use regex::Regex;
use regcheck_core::api::{BenchmarkTest, Pattern, PerformanceFunction, SanityCheck};

use crate::julia::julia_test;

pub const NAME: &str = "saxpy_test";
pub const SCRIPT: &str = "saxpy.jl";
pub const UNIT: &str = "MB/s";

lazy_static! {
    static ref VALIDATES: Regex = Regex::new(r"Solution Validates").expect("literal regex");
    static ref COPY_BW: Regex = Regex::new(r"Copy:\s+(\S+)").expect("literal regex");
    static ref SAXPY_BW: Regex = Regex::new(r"Saxpy:\s+(\S+)").expect("literal regex");
}

/// SAXPY / copy memory-bandwidth benchmark, valid on every system and environment.
pub fn saxpy_test() -> BenchmarkTest {
    let mut test = julia_test(NAME, SCRIPT, Vec::new());
    let def = test.definition_mut();
    def.valid_systems = vec!["*".to_string()];
    def.valid_environments = vec!["*".to_string()];

    test.with_sanity(SanityCheck::found(Pattern::from_regex(VALIDATES.clone())))
        .with_performance(PerformanceFunction::new(
            "copy_bw",
            UNIT,
            Pattern::from_regex(COPY_BW.clone()),
        ))
        .with_performance(PerformanceFunction::new(
            "saxpy_bw",
            UNIT,
            Pattern::from_regex(SAXPY_BW.clone()),
        ))
}

#[cfg(test)]
mod tests {
    use regcheck_core::api::{check_output, CapturedOutput, ControlConfig, Phase, Verdict};

    use super::*;

    fn check(stdout: &str) -> regcheck_core::api::TestReport {
        check_output(
            &saxpy_test(),
            &CapturedOutput::new(stdout, ""),
            &ControlConfig::default(),
            "r",
            "generic",
            "builtin",
        )
    }

    #[test]
    fn definition_is_valid() {
        saxpy_test().validate().unwrap();
    }

    #[test]
    fn extracts_both_bandwidths() {
        let r = check("Copy:   123.45\nSaxpy:   67.89\nSolution Validates\n");
        assert!(r.passed());
        assert_eq!(r.metric_value("copy_bw"), Some(123.45));
        assert_eq!(r.metric_value("saxpy_bw"), Some(67.89));
        assert!(r.metrics.iter().all(|m| m.unit == "MB/s"));
    }

    #[test]
    fn absent_marker_fails_sanity() {
        let r = check("Copy:   123.45\nSaxpy:   67.89\n");
        assert_eq!(r.verdict, Verdict::Failed);
        assert_eq!(r.failed_phase, Some(Phase::Sanity));
    }

    #[test]
    fn missing_saxpy_line_only_affects_saxpy_bw() {
        let r = check("Copy:   123.45\nSolution Validates\n");
        assert_eq!(r.metric_value("copy_bw"), Some(123.45));
        assert!(r.metric("saxpy_bw").unwrap().error.is_some());
    }
}
