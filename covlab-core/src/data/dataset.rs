//! The assembled dataset and its grouped view.

use super::normalize::column_millis;
use super::provider::DataError;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashMap;
use std::fmt;

/// Key label used for rows whose grouping value is null.
pub const NULL_GROUP_KEY: &str = "null";

/// Recoverable condition observed while assembling a dataset.
///
/// Diagnostics are logged as they happen and kept on the dataset for callers
/// that want to report them. They never change control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A day's partition was not published.
    MissingPartition { date: NaiveDate, locator: String },
    /// The expected date column was absent; no coercion was applied.
    MissingSchemaColumn { column: String },
}

impl Diagnostic {
    /// Emit the diagnostic as a warning event.
    pub fn emit(&self) {
        match self {
            Diagnostic::MissingPartition { date, locator } => {
                tracing::warn!(%date, %locator, "data for this day has not been published yet");
            }
            Diagnostic::MissingSchemaColumn { column } => {
                tracing::warn!(%column, "date column absent; charts using it as x axis will fail");
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingPartition { date, .. } => {
                write!(f, "data from the day {} has not been recorded yet", date.format("%Y%m%d"))
            }
            Diagnostic::MissingSchemaColumn { column } => {
                write!(f, "no '{column}' column in the dataset")
            }
        }
    }
}

/// Ordered concatenation of every fetched partition.
///
/// Rows are in partition (date) order, then in each partition's own order.
/// The engine hands the dataset over and keeps no reference to it.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    date_column: String,
    diagnostics: Vec<Diagnostic>,
}

impl Dataset {
    pub fn new(frame: DataFrame, date_column: impl Into<String>) -> Self {
        Self {
            frame,
            date_column: date_column.into(),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut DataFrame {
        &mut self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    /// True once the date column has been coerced to a datetime type.
    pub fn is_date_typed(&self) -> bool {
        self.frame
            .column(&self.date_column)
            .map(|c| matches!(c.dtype(), DataType::Datetime(_, _)))
            .unwrap_or(false)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Days whose partition was skipped, in the order they were met.
    pub fn missing_dates(&self) -> Vec<NaiveDate> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::MissingPartition { date, .. } => Some(*date),
                _ => None,
            })
            .collect()
    }

    /// Date column as epoch milliseconds.
    pub fn timestamps_millis(&self) -> Result<Vec<Option<i64>>, DataError> {
        column_millis(&self.frame, &self.date_column)
    }

    /// Partition the rows by the distinct values of `key_column`.
    pub fn group_by(&self, key_column: &str) -> Result<GroupedDataset, DataError> {
        GroupedDataset::new(&self.frame, key_column)
    }
}

/// Dataset split into disjoint sub-tables by one categorical column.
///
/// Groups are ordered by first appearance of their key, and each group keeps
/// the original relative order of its rows.
#[derive(Debug, Clone)]
pub struct GroupedDataset {
    groups: Vec<(String, DataFrame)>,
}

impl GroupedDataset {
    pub fn new(frame: &DataFrame, key_column: &str) -> Result<Self, DataError> {
        let keys = frame
            .column(key_column)
            .map_err(|_| DataError::MissingColumn {
                column: key_column.to_string(),
            })?
            .cast(&DataType::String)?;

        let mut order: Vec<(String, Vec<IdxSize>)> = Vec::new();
        let mut slot: HashMap<String, usize> = HashMap::new();
        for (row, key) in keys.str()?.into_iter().enumerate() {
            let key = key.unwrap_or(NULL_GROUP_KEY);
            let i = match slot.get(key) {
                Some(&i) => i,
                None => {
                    slot.insert(key.to_string(), order.len());
                    order.push((key.to_string(), Vec::new()));
                    order.len() - 1
                }
            };
            order[i].1.push(row as IdxSize);
        }

        let mut groups = Vec::with_capacity(order.len());
        for (key, rows) in order {
            let idx = IdxCa::from_vec("rows".into(), rows);
            groups.push((key, frame.take(&idx)?));
        }

        Ok(Self { groups })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&DataFrame> {
        self.groups.iter().find(|(k, _)| k == key).map(|(_, df)| df)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataFrame)> {
        self.groups.iter().map(|(k, df)| (k.as_str(), df))
    }
}
