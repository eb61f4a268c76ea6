//! Self-contained HTML dashboard.

use super::charts::{bar_chart, distribution_chart, trend_chart, traffic_light_chart};
use super::{escape_markup, RunSummary};
use crate::metrics::MetricKey;
use crate::policy::ExitPolicy;
use crate::store::DefectCollection;

const STYLE: &str = r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: 'Segoe UI', system-ui, sans-serif; background: #0a0e27; color: #fff; padding: 24px; }
    .container { max-width: 1400px; margin: 0 auto; }
    h1 { text-align: center; color: #2de2e6; letter-spacing: 4px; margin-bottom: 8px; }
    .timestamp { text-align: center; color: #c8f7ff; opacity: 0.7; margin-bottom: 32px; }
    .verdict { text-align: center; font-size: 1.6em; font-weight: bold; padding: 16px; margin-bottom: 32px; border: 2px solid; }
    .verdict.pass { color: #39ff88; border-color: #39ff88; }
    .verdict.fail { color: #ff3860; border-color: #ff3860; }
    .cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 16px; margin-bottom: 32px; }
    .card { background: rgba(45, 226, 230, 0.06); border: 1px solid #2de2e6; padding: 16px; }
    .card .name { color: #c8f7ff; font-size: 0.9em; text-transform: uppercase; }
    .card .value { color: #ffd500; font-size: 1.8em; font-weight: bold; margin-top: 8px; }
    .charts { display: grid; grid-template-columns: repeat(auto-fit, minmax(640px, 1fr)); gap: 16px; margin-bottom: 32px; }
    .chart { background: rgba(255, 79, 216, 0.04); border: 1px solid #ff4fd8; padding: 8px; text-align: center; }
    .criteria { list-style: none; }
    .criteria li { display: flex; justify-content: space-between; padding: 10px 16px; border-bottom: 1px solid rgba(45, 226, 230, 0.2); }
    .badge { font-weight: bold; padding: 2px 12px; border: 1px solid; }
    .badge.pass { color: #39ff88; border-color: #39ff88; }
    .badge.fail { color: #ff3860; border-color: #ff3860; }
"#;

fn metric_cards(summary: &RunSummary) -> String {
    summary
        .metrics
        .iter()
        .map(|(key, value)| {
            format!(
                "<div class=\"card\"><div class=\"name\">{}</div><div class=\"value\">{}</div></div>",
                escape_markup(key.display_name()),
                escape_markup(&value.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn criteria_list(summary: &RunSummary) -> String {
    summary
        .exit_criteria
        .detail
        .iter()
        .map(|(label, passed)| {
            let (class, text) = if *passed { ("pass", "PASS") } else { ("fail", "FAIL") };
            format!(
                "<li><span>{}</span><span class=\"badge {}\">{}</span></li>",
                escape_markup(label),
                class,
                text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the dashboard page for one run.
pub fn render_html(summary: &RunSummary, defects: &DefectCollection, policy: &ExitPolicy) -> String {
    let metric = |key: MetricKey| summary.metrics.number(key).unwrap_or(0.0);
    let floors = policy.traffic_light_floors();
    let lights = [
        (floors[0].0, metric(MetricKey::Coverage), floors[0].1),
        (floors[1].0, metric(MetricKey::ResolutionRate), floors[1].1),
        (floors[2].0, metric(MetricKey::TestingEfficiency), floors[2].1),
        (floors[3].0, metric(MetricKey::StabilityIndex), floors[3].1),
    ];

    let charts = [
        trend_chart(&summary.trend),
        bar_chart("Severity distribution", &defects.severity_counts()),
        distribution_chart("Status distribution", &defects.status_counts()),
        traffic_light_chart(&lights),
    ];

    let criteria = &summary.exit_criteria;
    let (verdict_class, verdict_text) = if criteria.overall_pass {
        ("pass", "APPROVED FOR PRODUCTION")
    } else {
        ("fail", "MINIMUM CRITERIA NOT MET")
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Testing Metrics Dashboard</title>
<style>{style}</style>
</head>
<body>
<div class="container">
<h1>TESTING METRICS DASHBOARD</h1>
<div class="timestamp">Generated {timestamp}</div>
<div class="verdict {verdict_class}">{verdict_text} &mdash; {passed}/{total} criteria ({percentage}%)</div>
<div class="cards">
{cards}
</div>
<div class="charts">
{charts}
</div>
<h2>Exit criteria</h2>
<ul class="criteria">
{criteria}
</ul>
</div>
</body>
</html>
"#,
        style = STYLE,
        timestamp = summary.timestamp.format("%Y-%m-%d %H:%M:%S"),
        verdict_class = verdict_class,
        verdict_text = verdict_text,
        passed = criteria.passed,
        total = criteria.total,
        percentage = criteria.percentage,
        cards = metric_cards(summary),
        charts = charts
            .iter()
            .map(|svg| format!("<div class=\"chart\">{}</div>", svg))
            .collect::<Vec<_>>()
            .join("\n"),
        criteria = criteria_list(summary),
    )
}
