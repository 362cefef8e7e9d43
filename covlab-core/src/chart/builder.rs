//! Chart constructors.
//!
//! All three constructors share the same steps: check the referenced columns
//! exist, pair plotted keys with colors, build the tooltip from a field list,
//! then finalize the cosmetics.

use super::fields::{NATIONAL_COLUMNS_TO_SHOW, NATIONAL_HOVER_FIELDS, REGIONAL_HOVER_FIELDS};
use super::palette::{assign_colors, SeriesSpec, CATEGORY20};
use super::spec::{finalize_cosmetics, ChartSpec, LineSeries};
use super::tooltip::tooltip_from_fields;
use super::ChartError;
use crate::data::Dataset;
use polars::prelude::*;

const NO_EXTRA_FIELDS: [&str; 0] = [];

/// Field lists and palette driving the chart constructors.
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    palette: Vec<String>,
    columns_to_show: Vec<String>,
    national_hover: Vec<String>,
    regional_hover: Vec<String>,
    line_width: f64,
    alpha: f64,
}

impl Default for ChartBuilder {
    fn default() -> Self {
        Self {
            palette: owned(&CATEGORY20),
            columns_to_show: owned(&NATIONAL_COLUMNS_TO_SHOW),
            national_hover: owned(&NATIONAL_HOVER_FIELDS),
            regional_hover: owned(&REGIONAL_HOVER_FIELDS),
            line_width: 4.0,
            alpha: 0.5,
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn require<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Column, ChartError> {
    frame.column(name).map_err(|_| ChartError::MissingColumn {
        column: name.to_string(),
    })
}

impl ChartBuilder {
    pub fn with_palette<I, S>(mut self, palette: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.palette = palette.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_columns_to_show<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns_to_show = columns.into_iter().map(Into::into).collect();
        self
    }

    fn line(&self, spec: SeriesSpec, x_field: &str, y_field: &str, source: DataFrame) -> LineSeries {
        LineSeries {
            legend_label: spec.key,
            color: spec.color,
            x_field: x_field.to_string(),
            y_field: y_field.to_string(),
            line_width: self.line_width,
            alpha: self.alpha,
            source,
        }
    }

    /// One line per column to show, each backed by its own `{x, y}` table.
    /// The tooltip shows only the two plotted values.
    pub fn simple(&self, dataset: &Dataset, x_field: &str) -> Result<ChartSpec, ChartError> {
        let frame = dataset.frame();
        let x = require(frame, x_field)?;

        let mut series = Vec::with_capacity(self.columns_to_show.len());
        for spec in assign_colors(&self.columns_to_show, &self.palette)? {
            let mut x_col = x.clone();
            x_col.rename("x".into());
            let mut y_col = require(frame, &spec.key)?.clone();
            y_col.rename("y".into());

            let source = DataFrame::new(vec![x_col, y_col])?;
            series.push(self.line(spec, "x", "y", source));
        }

        let mut chart = ChartSpec::new(series, tooltip_from_fields(&["x", "y"], &NO_EXTRA_FIELDS));
        finalize_cosmetics(&mut chart);
        Ok(chart)
    }

    /// One line per column to show over the whole dataset, with the full
    /// national hover list.
    pub fn overview(&self, dataset: &Dataset, x_field: &str) -> Result<ChartSpec, ChartError> {
        let frame = dataset.frame();
        require(frame, x_field)?;

        let mut series = Vec::with_capacity(self.columns_to_show.len());
        for spec in assign_colors(&self.columns_to_show, &self.palette)? {
            require(frame, &spec.key)?;
            let y_field = spec.key.clone();
            series.push(self.line(spec, x_field, &y_field, frame.clone()));
        }

        let mut chart = ChartSpec::new(
            series,
            tooltip_from_fields(&self.national_hover, &NO_EXTRA_FIELDS),
        );
        finalize_cosmetics(&mut chart);
        Ok(chart)
    }

    /// One line per distinct value of `group_by_field`, in first-seen order,
    /// plotting `y_field`.
    pub fn grouped(
        &self,
        dataset: &Dataset,
        group_by_field: &str,
        y_field: &str,
        x_field: &str,
    ) -> Result<ChartSpec, ChartError> {
        let frame = dataset.frame();
        require(frame, group_by_field)?;
        require(frame, x_field)?;
        require(frame, y_field)?;

        let groups = dataset.group_by(group_by_field)?;
        let keys: Vec<&str> = groups.keys().collect();
        let colors = assign_colors(&keys, &self.palette)?;

        let series = colors
            .into_iter()
            .zip(groups.iter())
            .map(|(spec, (_, group))| self.line(spec, x_field, y_field, group.clone()))
            .collect();

        let mut chart = ChartSpec::new(
            series,
            tooltip_from_fields(&self.regional_hover, &[group_by_field, y_field]),
        );
        finalize_cosmetics(&mut chart);
        Ok(chart)
    }
}

/// Simple national chart with the default field lists and palette.
pub fn build_simple_chart(dataset: &Dataset, x_field: &str) -> Result<ChartSpec, ChartError> {
    ChartBuilder::default().simple(dataset, x_field)
}

/// National overview chart with the default field lists and palette.
pub fn build_overview_chart(dataset: &Dataset, x_field: &str) -> Result<ChartSpec, ChartError> {
    ChartBuilder::default().overview(dataset, x_field)
}

/// Per-group chart with the default field lists and palette.
pub fn build_grouped_chart(
    dataset: &Dataset,
    group_by_field: &str,
    y_field: &str,
    x_field: &str,
) -> Result<ChartSpec, ChartError> {
    ChartBuilder::default().grouped(dataset, group_by_field, y_field, x_field)
}
