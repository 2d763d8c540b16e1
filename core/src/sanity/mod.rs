//! Output interpretation: sanity assertions and numeric extraction.

mod assert;
mod extract;
mod pattern;
mod perf;

pub use assert::{assert_found, assert_not_found, Expect, SanityCheck};
pub use extract::{extract_all, extract_single};
pub use pattern::{CapturedOutput, Pattern, Stream};
pub use perf::{MetricResult, PerformanceFunction};
