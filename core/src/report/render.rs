use serde_json::Value;

use super::{SessionReport, TestReport, Verdict};

pub fn to_json(report: &SessionReport) -> Value {
    serde_json::json!({
        "run_id": report.run_id,
        "system": report.system,
        "environ": report.environ,
        "totals": report.totals(),
        "tests": report.tests,
    })
}

fn format_test(out: &mut String, r: &TestReport) {
    let label = match r.verdict {
        Verdict::Passed => "[  PASSED  ]",
        Verdict::Failed => "[  FAILED  ]",
        Verdict::Skipped => "[  SKIPPED ]",
    };
    out.push_str(&format!(
        "{label} {} on {} using {} ({} ms)\n",
        r.test, r.system, r.environ, r.duration_ms
    ));
    if let Some(msg) = &r.message {
        match r.failed_phase {
            Some(phase) => out.push_str(&format!("    phase {phase}: {msg}\n")),
            None => out.push_str(&format!("    {msg}\n")),
        }
    }
    for m in &r.metrics {
        match (m.value, &m.error) {
            (Some(v), _) => out.push_str(&format!("    {}: {} {}\n", m.name, v, m.unit)),
            (None, Some(e)) => out.push_str(&format!("    {}: error: {}\n", m.name, e)),
            (None, None) => out.push_str(&format!("    {}: missing\n", m.name)),
        }
    }
}

pub fn format_text(report: &SessionReport) -> String {
    let mut out = String::new();
    for r in &report.tests {
        format_test(&mut out, r);
    }
    let t = report.totals();
    out.push_str(&format!(
        "Ran {} test(s) on {} using {}: {} passed, {} failed, {} skipped\n",
        t.tests, report.system, report.environ, t.passed, t.failed, t.skipped
    ));
    out
}
