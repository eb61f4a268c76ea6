//! Inline SVG charts for the HTML dashboard.
//!
//! Four charts: the trend lines, severity distribution, status distribution
//! and the threshold traffic light. Each function returns a standalone
//! `<svg>` element sized by `CHART_WIDTH` x `CHART_HEIGHT`.

use super::escape_markup;
use crate::models::TrendDay;

pub const CHART_WIDTH: u32 = 640;
pub const CHART_HEIGHT: u32 = 320;

const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 44.0;
const MARGIN_BOTTOM: f64 = 48.0;

const AXIS_COLOR: &str = "#2de2e6";
const TEXT_COLOR: &str = "#c8f7ff";
const PASS_COLOR: &str = "#39ff88";
const FAIL_COLOR: &str = "#ff3860";
const PALETTE: [&str; 6] = ["#ff3860", "#ff4fd8", "#ffd500", "#39ff88", "#2de2e6", "#9d7bff"];

fn plot_width() -> f64 {
    CHART_WIDTH as f64 - MARGIN_LEFT - MARGIN_RIGHT
}

fn plot_height() -> f64 {
    CHART_HEIGHT as f64 - MARGIN_TOP - MARGIN_BOTTOM
}

fn open_svg(title: &str) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" role=\"img\" aria-label=\"{t}\">",
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        t = escape_markup(title)
    ));
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"26\" text-anchor=\"middle\" fill=\"{}\" font-size=\"16\" font-weight=\"bold\">{}</text>",
        CHART_WIDTH as f64 / 2.0,
        AXIS_COLOR,
        escape_markup(title)
    ));
    svg
}

fn no_data(mut svg: String) -> String {
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"14\">no data</text></svg>",
        CHART_WIDTH as f64 / 2.0,
        CHART_HEIGHT as f64 / 2.0,
        TEXT_COLOR
    ));
    svg
}

fn push_axes(svg: &mut String) {
    let bottom = MARGIN_TOP + plot_height();
    svg.push_str(&format!(
        "<line x1=\"{l:.1}\" y1=\"{t:.1}\" x2=\"{l:.1}\" y2=\"{b:.1}\" stroke=\"{c}\" stroke-width=\"1\"/>\
         <line x1=\"{l:.1}\" y1=\"{b:.1}\" x2=\"{r:.1}\" y2=\"{b:.1}\" stroke=\"{c}\" stroke-width=\"1\"/>",
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = bottom,
        r = MARGIN_LEFT + plot_width(),
        c = AXIS_COLOR
    ));
}

/// Value gridlines at 0, half and full scale; small scales collapse repeated ticks.
fn push_value_grid(svg: &mut String, max: u32) {
    let mut ticks = vec![0, max / 2, max];
    ticks.dedup();
    for tick in ticks {
        let y = MARGIN_TOP + plot_height() - plot_height() * tick as f64 / max as f64;
        svg.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"{}\" stroke-opacity=\"0.2\" stroke-dasharray=\"4 4\"/>\
             <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{}\" font-size=\"11\">{}</text>",
            MARGIN_LEFT,
            MARGIN_LEFT + plot_width(),
            AXIS_COLOR,
            MARGIN_LEFT - 8.0,
            y + 4.0,
            TEXT_COLOR,
            tick,
            y = y
        ));
    }
}

/// New, closed and cumulative open series per day.
pub fn trend_chart(days: &[TrendDay]) -> String {
    let svg = open_svg("Defect trend");
    if days.is_empty() {
        return no_data(svg);
    }
    let mut svg = svg;

    let max = days
        .iter()
        .flat_map(|d| [d.new_count, d.closed_count, d.cumulative_open])
        .max()
        .unwrap_or(0)
        .max(1);

    let x = |i: usize| {
        if days.len() == 1 {
            MARGIN_LEFT + plot_width() / 2.0
        } else {
            MARGIN_LEFT + plot_width() * i as f64 / (days.len() - 1) as f64
        }
    };
    let y = |v: u32| MARGIN_TOP + plot_height() - plot_height() * v as f64 / max as f64;

    push_value_grid(&mut svg, max);
    push_axes(&mut svg);

    let series: [(&str, &str, Vec<u32>); 3] = [
        ("New", PALETTE[4], days.iter().map(|d| d.new_count).collect()),
        ("Closed", PALETTE[1], days.iter().map(|d| d.closed_count).collect()),
        ("Open", PALETTE[2], days.iter().map(|d| d.cumulative_open).collect()),
    ];

    for (idx, (name, color, values)) in series.iter().enumerate() {
        let points: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:.1},{:.1}", x(i), y(*v)))
            .collect();
        svg.push_str(&format!(
            "<polyline fill=\"none\" stroke=\"{}\" stroke-width=\"3\" points=\"{}\"/>",
            color,
            points.join(" ")
        ));
        for (i, v) in values.iter().enumerate() {
            svg.push_str(&format!(
                "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"4\" fill=\"{}\"/>",
                x(i),
                y(*v),
                color
            ));
        }
        let legend_x = MARGIN_LEFT + 10.0 + idx as f64 * 90.0;
        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"12\" height=\"12\" fill=\"{}\"/>\
             <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"12\">{}</text>",
            legend_x,
            MARGIN_TOP - 4.0,
            color,
            legend_x + 16.0,
            MARGIN_TOP + 6.0,
            TEXT_COLOR,
            name
        ));
    }

    for (i, day) in days.iter().enumerate() {
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"11\">{}</text>",
            x(i),
            MARGIN_TOP + plot_height() + 20.0,
            TEXT_COLOR,
            day.day.format("%m-%d")
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Vertical bars, one per category.
pub fn bar_chart(title: &str, counts: &[(String, usize)]) -> String {
    let svg = open_svg(title);
    if counts.is_empty() {
        return no_data(svg);
    }
    let mut svg = svg;

    let max = counts.iter().map(|(_, c)| *c as u32).max().unwrap_or(0).max(1);
    let slot = plot_width() / counts.len() as f64;
    let bar_width = slot * 0.6;

    push_value_grid(&mut svg, max);
    push_axes(&mut svg);

    for (i, (name, count)) in counts.iter().enumerate() {
        let height = plot_height() * *count as f64 / max as f64;
        let bx = MARGIN_LEFT + slot * i as f64 + (slot - bar_width) / 2.0;
        let by = MARGIN_TOP + plot_height() - height;
        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>\
             <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"12\">{}</text>\
             <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"12\">{}</text>",
            bx,
            by,
            bar_width,
            height,
            PALETTE[i % PALETTE.len()],
            AXIS_COLOR,
            bx + bar_width / 2.0,
            by - 6.0,
            TEXT_COLOR,
            count,
            bx + bar_width / 2.0,
            MARGIN_TOP + plot_height() + 20.0,
            TEXT_COLOR,
            escape_markup(name)
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Horizontal share bars: each category as a percentage of all records.
pub fn distribution_chart(title: &str, counts: &[(String, usize)]) -> String {
    let svg = open_svg(title);
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    if total == 0 {
        return no_data(svg);
    }
    let mut svg = svg;

    let row = plot_height() / counts.len() as f64;
    let bar_height = (row * 0.6).min(32.0);

    for (i, (name, count)) in counts.iter().enumerate() {
        let share = *count as f64 / total as f64;
        let by = MARGIN_TOP + row * i as f64 + (row - bar_height) / 2.0;
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{}\" font-size=\"12\">{}</text>\
             <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>\
             <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"12\">{:.1}%</text>",
            MARGIN_LEFT - 8.0,
            by + bar_height / 2.0 + 4.0,
            TEXT_COLOR,
            escape_markup(name),
            MARGIN_LEFT,
            by,
            plot_width() * 0.85 * share,
            bar_height,
            PALETTE[(i + 3) % PALETTE.len()],
            AXIS_COLOR,
            MARGIN_LEFT + plot_width() * 0.85 * share + 8.0,
            by + bar_height / 2.0 + 4.0,
            TEXT_COLOR,
            share * 100.0
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Metric bars on a 0-100 scale, green at or above their floor, red below.
pub fn traffic_light_chart(entries: &[(&str, f64, f64)]) -> String {
    let svg = open_svg("Key metrics vs thresholds");
    if entries.is_empty() {
        return no_data(svg);
    }
    let mut svg = svg;

    let scale = |v: f64| plot_width() * 0.9 * v.clamp(0.0, 100.0) / 100.0;
    let row = plot_height() / entries.len() as f64;
    let bar_height = (row * 0.55).min(30.0);

    push_axes(&mut svg);

    for (i, (name, value, floor)) in entries.iter().enumerate() {
        let by = MARGIN_TOP + row * i as f64 + (row - bar_height) / 2.0;
        let color = if value >= floor { PASS_COLOR } else { FAIL_COLOR };
        let threshold_x = MARGIN_LEFT + scale(*floor);
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{}\" font-size=\"12\">{}</text>\
             <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"#666666\" fill-opacity=\"0.3\"/>\
             <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\" fill-opacity=\"0.85\"/>\
             <line x1=\"{tx:.1}\" y1=\"{:.1}\" x2=\"{tx:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"2\"/>\
             <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"12\" font-weight=\"bold\">{}%</text>",
            MARGIN_LEFT - 8.0,
            by + bar_height / 2.0 + 4.0,
            TEXT_COLOR,
            escape_markup(name),
            MARGIN_LEFT,
            by,
            scale(*floor),
            bar_height,
            MARGIN_LEFT,
            by,
            scale(*value),
            bar_height,
            color,
            by - 4.0,
            by + bar_height + 4.0,
            AXIS_COLOR,
            MARGIN_LEFT + scale(*value).max(scale(*floor)) + 8.0,
            by + bar_height / 2.0 + 4.0,
            TEXT_COLOR,
            value,
            tx = threshold_x
        ));
    }

    svg.push_str("</svg>");
    svg
}
