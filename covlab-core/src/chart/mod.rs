//! Chart construction and rendering

pub mod builder;
pub mod fields;
pub mod palette;
pub mod render;
pub mod spec;
pub mod tooltip;

pub use builder::{build_grouped_chart, build_overview_chart, build_simple_chart, ChartBuilder};
pub use palette::{assign_colors, SeriesSpec, CATEGORY20};
pub use render::{ChartRenderer, HtmlRenderer};
pub use spec::{finalize_cosmetics, ChartSpec, Cosmetics, LineSeries};
pub use tooltip::{tooltip_from_fields, TooltipEntry, TooltipSpec};

use crate::data::DataError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("column '{column}' not found in dataset")]
    MissingColumn { column: String },

    #[error("color palette is empty")]
    EmptyPalette,

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("dataframe error: {0}")]
    Polars(#[from] PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
