//! Standalone HTML renderer.
//!
//! Produces one self-contained document per chart: inline SVG lines over a
//! shared date axis, an invisible hover marker per point carrying the tooltip
//! text, and a legend whose entries toggle their series on click.

use super::spec::{ChartSpec, ClickPolicy, Cosmetics, LegendLocation, LineSeries};
use super::tooltip::TooltipSpec;
use super::ChartError;
use crate::data::normalize::column_millis;
use chrono::DateTime;
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 120.0;

const MAX_TICKS: usize = 20;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Draws a ChartSpec into a viewable artifact.
pub trait ChartRenderer {
    /// Render `chart` to `output` and return the written path.
    fn render(&self, chart: &ChartSpec, output: &Path) -> Result<PathBuf, ChartError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

/// One drawable point with its hover text.
struct Point {
    x: i64,
    y: f64,
    hover: String,
}

impl ChartRenderer for HtmlRenderer {
    fn render(&self, chart: &ChartSpec, output: &Path) -> Result<PathBuf, ChartError> {
        let html = self.render_to_string(chart)?;
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, html)?;
        tracing::info!(path = %output.display(), series = chart.series.len(), "chart written");
        Ok(output.to_path_buf())
    }
}

impl HtmlRenderer {
    pub fn render_to_string(&self, chart: &ChartSpec) -> Result<String, ChartError> {
        let mut lines = Vec::with_capacity(chart.series.len());
        for series in &chart.series {
            lines.push(series_points(series, &chart.tooltip)?);
        }

        let c = &chart.cosmetics;
        let svg = draw_svg(chart, c, &lines);

        let mut html = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<title>{}</title>\n<style>\n\
body {{ font-family: sans-serif; }}\n\
.hover {{ cursor: crosshair; }}\n\
.legend-item {{ cursor: {}; }}\n\
.legend-item.muted text {{ fill: #bbb; }}\n\
</style>\n</head>\n<body>\n",
            escape(&c.title),
            if c.legend.click_policy == ClickPolicy::Hide { "pointer" } else { "default" }
        );
        html.push_str(&svg);
        if c.legend.click_policy == ClickPolicy::Hide {
            html.push_str(TOGGLE_SCRIPT);
        }
        html.push_str("</body>\n</html>\n");
        Ok(html)
    }
}

const TOGGLE_SCRIPT: &str = "<script>\n\
function toggleSeries(i) {\n\
  var g = document.getElementById('series-' + i);\n\
  var item = document.getElementById('legend-' + i);\n\
  var hidden = g.style.display === 'none';\n\
  g.style.display = hidden ? '' : 'none';\n\
  item.classList.toggle('muted', !hidden);\n\
}\n\
</script>\n";

/// Pull x, y and hover text out of a series source. Rows with a null x or a
/// non-numeric y are skipped.
fn series_points(series: &LineSeries, tooltip: &TooltipSpec) -> Result<Vec<Point>, ChartError> {
    let source = &series.source;
    let xs = column_millis(source, &series.x_field)?;
    let ys: Vec<Option<f64>> = source
        .column(&series.y_field)
        .map_err(|_| ChartError::MissingColumn {
            column: series.y_field.clone(),
        })?
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .collect();

    let mut hover_columns = Vec::with_capacity(tooltip.len());
    for entry in tooltip.entries() {
        hover_columns.push((entry.label.as_str(), column_text(source, &entry.field)?));
    }

    let mut points = Vec::new();
    for (row, (x, y)) in xs.into_iter().zip(ys).enumerate() {
        let (Some(x), Some(y)) = (x, y) else { continue };
        if !y.is_finite() {
            continue;
        }
        let hover = hover_columns
            .iter()
            .map(|(label, values)| {
                let value = values
                    .as_ref()
                    .and_then(|v| v.get(row).cloned())
                    .unwrap_or_else(|| "???".to_string());
                format!("{label}: {value}")
            })
            .collect::<Vec<_>>()
            .join("\n");
        points.push(Point { x, y, hover });
    }
    Ok(points)
}

/// Column values as display text; `None` when the source lacks the column.
fn column_text(source: &DataFrame, field: &str) -> Result<Option<Vec<String>>, ChartError> {
    let Ok(col) = source.column(field) else {
        return Ok(None);
    };
    if matches!(col.dtype(), DataType::Datetime(_, _)) {
        let millis = column_millis(source, field)?;
        return Ok(Some(
            millis
                .into_iter()
                .map(|ms| {
                    ms.and_then(DateTime::from_timestamp_millis)
                        .map(|dt| dt.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_else(|| "NaN".to_string())
                })
                .collect(),
        ));
    }
    let text = col.cast(&DataType::String)?;
    Ok(Some(
        text.str()?
            .into_iter()
            .map(|v| v.unwrap_or("NaN").to_string())
            .collect(),
    ))
}

/// Linear map from data space into the plot area.
struct Frame {
    x_min: i64,
    x_max: i64,
    y_min: f64,
    y_max: f64,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Frame {
    fn new(c: &Cosmetics, lines: &[Vec<Point>]) -> Self {
        let all = lines.iter().flatten();
        let (mut x_min, mut x_max) = (i64::MAX, i64::MIN);
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in all {
            x_min = x_min.min(p.x);
            x_max = x_max.max(p.x);
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }
        if x_min > x_max {
            x_min = 0;
            x_max = DAY_MS;
        } else if x_min == x_max {
            x_min -= DAY_MS;
            x_max += DAY_MS;
        }
        if !(y_min.is_finite() && y_max.is_finite()) {
            y_min = 0.0;
            y_max = 1.0;
        } else if y_min == y_max {
            y_min -= 1.0;
            y_max += 1.0;
        } else {
            let pad = (y_max - y_min) * 0.05;
            y_min -= pad;
            y_max += pad;
        }

        Self {
            x_min,
            x_max,
            y_min,
            y_max,
            left: MARGIN_LEFT,
            right: c.width as f64 - MARGIN_RIGHT,
            top: MARGIN_TOP,
            bottom: c.height as f64 - MARGIN_BOTTOM,
        }
    }

    fn px(&self, x: i64) -> f64 {
        let t = (x - self.x_min) as f64 / (self.x_max - self.x_min) as f64;
        self.left + t * (self.right - self.left)
    }

    fn py(&self, y: f64) -> f64 {
        let t = (y - self.y_min) / (self.y_max - self.y_min);
        self.bottom - t * (self.bottom - self.top)
    }
}

fn draw_svg(chart: &ChartSpec, c: &Cosmetics, lines: &[Vec<Point>]) -> String {
    let frame = Frame::new(c, lines);
    let template: Vec<String> = chart
        .tooltip
        .pairs()
        .into_iter()
        .map(|(label, placeholder)| format!("{label}: {placeholder}"))
        .collect();
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" data-tooltip=\"{}\">\n",
        c.width,
        c.height,
        c.width,
        c.height,
        escape(&template.join("\n"))
    );
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"24\" font-size=\"16\" font-weight=\"bold\">{}</text>\n",
        frame.left,
        escape(&c.title)
    ));
    svg.push_str(&format!(
        "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"#e5e5e5\"/>\n",
        frame.left,
        frame.top,
        frame.right - frame.left,
        frame.bottom - frame.top
    ));

    draw_y_axis(&mut svg, &frame, c.y_axis.use_scientific);
    draw_x_axis(&mut svg, &frame, c);

    for (i, (series, points)) in chart.series.iter().zip(lines).enumerate() {
        svg.push_str(&format!("<g id=\"series-{i}\" class=\"series\">\n"));
        let path: Vec<String> = points
            .iter()
            .map(|p| format!("{:.1},{:.1}", frame.px(p.x), frame.py(p.y)))
            .collect();
        svg.push_str(&format!(
            "<polyline fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-opacity=\"{}\" points=\"{}\"/>\n",
            escape(&series.color),
            series.line_width,
            series.alpha,
            path.join(" ")
        ));
        for p in points {
            svg.push_str(&format!(
                "<circle class=\"hover\" cx=\"{:.1}\" cy=\"{:.1}\" r=\"5\" fill=\"{}\" fill-opacity=\"0\"><title>{}</title></circle>\n",
                frame.px(p.x),
                frame.py(p.y),
                escape(&series.color),
                escape(&p.hover)
            ));
        }
        svg.push_str("</g>\n");
    }

    draw_legend(&mut svg, &frame, chart);
    svg.push_str("</svg>\n");
    svg
}

fn draw_y_axis(svg: &mut String, frame: &Frame, scientific: bool) {
    let step = nice_step((frame.y_max - frame.y_min) / 5.0);
    let first = (frame.y_min / step).ceil() * step;
    let count = ((frame.y_max - first) / step).floor().max(0.0) as usize;
    for k in 0..=count.min(MAX_TICKS) {
        let tick = first + k as f64 * step;
        let y = frame.py(tick);
        svg.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#eee\"/>\n",
            frame.left, frame.right
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\">{}</text>\n",
            frame.left - 6.0,
            y + 4.0,
            format_value(tick, scientific)
        ));
    }
}

fn draw_x_axis(svg: &mut String, frame: &Frame, c: &Cosmetics) {
    let step = date_step(frame.x_max - frame.x_min);
    let format = c.x_axis.for_spacing(step);
    let degrees = -c.x_axis.label_orientation.to_degrees();
    let mut tick = frame.x_min.div_euclid(step) * step;
    if tick < frame.x_min {
        tick += step;
    }
    while tick <= frame.x_max {
        let x = frame.px(tick);
        let label = DateTime::from_timestamp_millis(tick)
            .map(|dt| dt.naive_utc().format(format).to_string())
            .unwrap_or_default();
        let y = frame.bottom + 14.0;
        svg.push_str(&format!(
            "<line x1=\"{x:.1}\" y1=\"{:.1}\" x2=\"{x:.1}\" y2=\"{:.1}\" stroke=\"#999\"/>\n",
            frame.bottom,
            frame.bottom + 5.0
        ));
        svg.push_str(&format!(
            "<text x=\"{x:.1}\" y=\"{y:.1}\" font-size=\"11\" text-anchor=\"end\" transform=\"rotate({degrees:.1} {x:.1} {y:.1})\">{}</text>\n",
            escape(&label)
        ));
        tick += step;
    }
}

fn draw_legend(svg: &mut String, frame: &Frame, chart: &ChartSpec) {
    if chart.series.is_empty() {
        return;
    }
    let legend = &chart.cosmetics.legend;
    let row_height = 16.0;
    let width = 10.0
        + 7.0 * chart
            .series
            .iter()
            .map(|s| s.legend_label.chars().count())
            .max()
            .unwrap_or(0) as f64
        + 30.0;
    let height = row_height * chart.series.len() as f64 + 8.0;
    let (x0, y0) = match legend.location {
        LegendLocation::TopLeft => (frame.left + 8.0, frame.top + 8.0),
        LegendLocation::TopRight => (frame.right - width - 8.0, frame.top + 8.0),
        LegendLocation::BottomLeft => (frame.left + 8.0, frame.bottom - height - 8.0),
        LegendLocation::BottomRight => (frame.right - width - 8.0, frame.bottom - height - 8.0),
    };

    svg.push_str(&format!(
        "<g class=\"legend\" data-location=\"{}\">\n<rect x=\"{x0:.1}\" y=\"{y0:.1}\" width=\"{width:.1}\" height=\"{height:.1}\" fill=\"white\" fill-opacity=\"0.85\" stroke=\"#ddd\"/>\n",
        legend.location.as_str()
    ));
    for (i, series) in chart.series.iter().enumerate() {
        let y = y0 + 4.0 + row_height * i as f64;
        let onclick = if legend.click_policy == ClickPolicy::Hide {
            format!(" onclick=\"toggleSeries({i})\"")
        } else {
            String::new()
        };
        svg.push_str(&format!(
            "<g id=\"legend-{i}\" class=\"legend-item\"{onclick}>\
<rect x=\"{:.1}\" y=\"{:.1}\" width=\"20\" height=\"4\" fill=\"{}\"/>\
<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\">{}</text></g>\n",
            x0 + 6.0,
            y + 6.0,
            escape(&series.color),
            x0 + 32.0,
            y + 11.0,
            escape(&series.legend_label)
        ));
    }
    svg.push_str("</g>\n");
}

/// Round a raw tick step to 1, 2 or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    if !(raw.is_finite() && raw > 0.0) {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Date tick spacing giving at most eight ticks over `span_ms`.
fn date_step(span_ms: i64) -> i64 {
    const STEPS: [i64; 14] = [
        MINUTE_MS,
        15 * MINUTE_MS,
        HOUR_MS,
        6 * HOUR_MS,
        12 * HOUR_MS,
        DAY_MS,
        2 * DAY_MS,
        7 * DAY_MS,
        14 * DAY_MS,
        30 * DAY_MS,
        61 * DAY_MS,
        91 * DAY_MS,
        182 * DAY_MS,
        365 * DAY_MS,
    ];
    STEPS
        .iter()
        .copied()
        .find(|step| span_ms / step <= 8)
        .unwrap_or(365 * DAY_MS * (span_ms / (365 * DAY_MS * 8) + 1))
}

/// Tick label for a value; plain notation unless `scientific` and the
/// magnitude calls for it.
fn format_value(v: f64, scientific: bool) -> String {
    let magnitude = v.abs();
    if scientific && v != 0.0 && !(1e-3..1e4).contains(&magnitude) {
        return format!("{v:.1e}");
    }
    if v.fract().abs() < 1e-9 {
        format!("{v:.0}")
    } else {
        let s = format!("{v:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("&#10;"),
            _ => out.push(ch),
        }
    }
    out
}
