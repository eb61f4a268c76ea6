//! Plain-text run summary for the terminal.

use crate::exit_criteria::ExitCriteriaResult;
use crate::metrics::MetricsSnapshot;

const RULE: &str = "============================================================";

fn section(out: &mut String, title: &str) {
    out.push_str(RULE);
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
}

/// Metric table, criteria table and the final verdict.
pub fn render_console(snapshot: &MetricsSnapshot, result: &ExitCriteriaResult) -> String {
    let mut out = String::new();

    section(&mut out, "METRICS RESULTS");
    for (key, value) in snapshot.iter() {
        out.push_str(&format!("{:.<40} {}\n", key.display_name(), value));
    }

    out.push('\n');
    section(&mut out, "EXIT CRITERIA");
    for criterion in &result.criteria {
        let status = if criterion.passed { "✓ PASS" } else { "✗ FAIL" };
        out.push_str(&format!("{:.<50} {}\n", criterion.label, status));
    }

    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "FINAL RESULT: {}/{} criteria met ({}%)\n",
        result.passed, result.total, result.percentage
    ));
    if result.overall_pass {
        out.push_str("✓ APPROVED FOR PRODUCTION\n");
    } else {
        out.push_str("✗ MINIMUM CRITERIA NOT MET\n");
    }
    out.push_str(RULE);
    out.push('\n');
    out
}
