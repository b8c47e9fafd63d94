//! SVG bar chart of elapsed time per strategy
//!
//! One bar per strategy at its mean elapsed time, with a whisker from the
//! fastest to the slowest repeat. Plain SVG text so no plotting backend is
//! needed.

use crate::benchmark::BenchmarkReport;
use crate::output::traits::{OutputResult, ReportWriter};
use std::fmt::Write;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 70.0;
const GRID_LINES: usize = 5;
const COLORS: [&str; 3] = ["#4c72b0", "#55a868", "#c44e52"];

/// Writes the benchmark plot
pub struct SvgChartWriter {
    title: String,
}

impl SvgChartWriter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for SvgChartWriter {
    fn default() -> Self {
        Self::new("Crawler Performance Comparison")
    }
}

impl ReportWriter for SvgChartWriter {
    fn name(&self) -> &'static str {
        "benchmark plot"
    }

    fn render(&self, report: &BenchmarkReport) -> OutputResult<String> {
        Ok(render_chart(&self.title, report))
    }
}

/// Renders the chart as an SVG document
pub fn render_chart(title: &str, report: &BenchmarkReport) -> String {
    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_height;

    let axis_max = nice_ceiling(
        report
            .results
            .iter()
            .map(|r| r.max_seconds())
            .fold(0.0, f64::max),
    );
    let y_for = |seconds: f64| baseline - (seconds / axis_max) * plot_height;

    let mut svg = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = writeln!(
        svg,
        r#"  <rect width="{}" height="{}" fill="white"/>"#,
        WIDTH, HEIGHT
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="20">{}</text>"#,
        WIDTH / 2.0,
        MARGIN_TOP / 2.0 + 6.0,
        escape(title)
    );

    for step in 0..=GRID_LINES {
        let seconds = axis_max * step as f64 / GRID_LINES as f64;
        let y = y_for(seconds);
        let _ = writeln!(
            svg,
            r##"  <line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#bbbbbb" stroke-dasharray="4 4"/>"##,
            MARGIN_LEFT,
            MARGIN_LEFT + plot_width,
            y = y
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{:.2}</text>"#,
            MARGIN_LEFT - 8.0,
            y + 4.0,
            seconds
        );
    }

    let _ = writeln!(
        svg,
        r#"  <text x="20" y="{:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 20 {:.1})">Seconds</text>"#,
        MARGIN_TOP + plot_height / 2.0,
        MARGIN_TOP + plot_height / 2.0
    );

    let slots = report.results.len().max(1) as f64;
    let slot_width = plot_width / slots;
    let bar_width = slot_width * 0.5;

    for (index, result) in report.results.iter().enumerate() {
        let center = MARGIN_LEFT + slot_width * (index as f64 + 0.5);
        let mean_y = y_for(result.mean_seconds());
        let color = COLORS[index % COLORS.len()];

        let _ = writeln!(
            svg,
            r#"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            center - bar_width / 2.0,
            mean_y,
            bar_width,
            baseline - mean_y,
            color
        );

        if result.runs.len() > 1 {
            let low = y_for(result.min_seconds());
            let high = y_for(result.max_seconds());
            let cap = bar_width / 6.0;
            let _ = writeln!(
                svg,
                r#"  <path d="M{:.1} {:.1} V{:.1} M{:.1} {:.1} H{:.1} M{:.1} {:.1} H{:.1}" stroke="black" fill="none"/>"#,
                center,
                low,
                high,
                center - cap,
                low,
                center + cap,
                center - cap,
                high,
                center + cap
            );
        }

        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{:.2}s</text>"#,
            center,
            y_for(result.max_seconds()).min(mean_y) - 6.0,
            result.mean_seconds()
        );

        let (succeeded, total) = result.latest_counts();
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14">{}</text>"#,
            center,
            baseline + 22.0,
            escape(result.strategy.label())
        );
        let _ = writeln!(
            svg,
            r##"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="11" fill="#555555">{}/{} succeeded</text>"##,
            center,
            baseline + 40.0,
            succeeded,
            total
        );
    }

    let _ = writeln!(
        svg,
        r#"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black"/>"#,
        MARGIN_LEFT,
        baseline,
        MARGIN_LEFT + plot_width,
        baseline
    );
    svg.push_str("</svg>\n");
    svg
}

/// Rounds up to 1, 2 or 5 times a power of ten; 1.0 for empty data
fn nice_ceiling(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 1.0;
    }

    let magnitude = 10f64.powf(value.log10().floor());
    let normalized = value / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
