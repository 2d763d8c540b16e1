mod render;
mod types;

pub use render::{format_text, to_json};
pub use types::{MetricOutcome, SessionReport, TestReport, Totals, Verdict};
