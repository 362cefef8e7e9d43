//! Declarative chart description handed to a renderer.

use super::tooltip::TooltipSpec;
use polars::prelude::DataFrame;
use std::f64::consts::FRAC_PI_4;

/// One line: a legend label, its color, and the rows it is drawn from.
#[derive(Debug, Clone)]
pub struct LineSeries {
    pub legend_label: String,
    pub color: String,
    pub x_field: String,
    pub y_field: String,
    pub line_width: f64,
    pub alpha: f64,
    /// Rows backing the line; tooltip fields are looked up here.
    pub source: DataFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendLocation {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl LegendLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            LegendLocation::TopLeft => "top_left",
            LegendLocation::TopRight => "top_right",
            LegendLocation::BottomLeft => "bottom_left",
            LegendLocation::BottomRight => "bottom_right",
        }
    }
}

/// What clicking a legend entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickPolicy {
    None,
    Hide,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendSettings {
    pub location: LegendLocation,
    pub click_policy: ClickPolicy,
}

/// Tick label formats of the date axis, chosen by tick spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct DateAxisFormat {
    pub seconds: String,
    pub minutes: String,
    pub hours: String,
    pub days: String,
    /// Label rotation in radians.
    pub label_orientation: f64,
}

impl DateAxisFormat {
    /// Pick the format for ticks `spacing_ms` apart.
    pub fn for_spacing(&self, spacing_ms: i64) -> &str {
        const MINUTE: i64 = 60_000;
        const HOUR: i64 = 60 * MINUTE;
        const DAY: i64 = 24 * HOUR;
        if spacing_ms < MINUTE {
            &self.seconds
        } else if spacing_ms < HOUR {
            &self.minutes
        } else if spacing_ms < DAY {
            &self.hours
        } else {
            &self.days
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueAxisFormat {
    pub use_scientific: bool,
}

/// Presentation settings shared by every chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Cosmetics {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub legend: LegendSettings,
    pub x_axis: DateAxisFormat,
    pub y_axis: ValueAxisFormat,
}

impl Default for Cosmetics {
    /// Bare figure settings, before `finalize_cosmetics` runs.
    fn default() -> Self {
        Self {
            title: String::new(),
            width: 650,
            height: 650,
            legend: LegendSettings {
                location: LegendLocation::TopRight,
                click_policy: ClickPolicy::None,
            },
            x_axis: DateAxisFormat {
                seconds: "%Ss".to_string(),
                minutes: "%H:%M".to_string(),
                hours: "%Hh".to_string(),
                days: "%m/%d".to_string(),
                label_orientation: 0.0,
            },
            y_axis: ValueAxisFormat {
                use_scientific: true,
            },
        }
    }
}

/// Title every chart carries.
pub const CHART_TITLE: &str = "CoVid-19 in Italy";

/// Apply the uniform presentation settings. Every constructor calls this last.
pub fn finalize_cosmetics(spec: &mut ChartSpec) {
    let c = &mut spec.cosmetics;
    c.y_axis.use_scientific = false;
    c.title = CHART_TITLE.to_string();
    c.legend.location = LegendLocation::TopLeft;
    c.legend.click_policy = ClickPolicy::Hide;
    c.x_axis = DateAxisFormat {
        seconds: "%d %m %Y".to_string(),
        minutes: "%d %m %Y".to_string(),
        hours: "%d %m %Y".to_string(),
        days: "%d %B %Y".to_string(),
        label_orientation: FRAC_PI_4,
    };
}

/// Lines, hover tooltip and presentation settings of one chart.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub series: Vec<LineSeries>,
    pub tooltip: TooltipSpec,
    pub cosmetics: Cosmetics,
}

impl ChartSpec {
    pub fn new(series: Vec<LineSeries>, tooltip: TooltipSpec) -> Self {
        Self {
            series,
            tooltip,
            cosmetics: Cosmetics::default(),
        }
    }

    pub fn legend_labels(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.legend_label.as_str()).collect()
    }
}
