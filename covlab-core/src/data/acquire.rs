//! Acquisition engine: fetch every day in a range and assemble one dataset.
//!
//! Failure policy:
//! - the first day seeds the schema, so any failure there is fatal
//! - a later day that is not published is skipped with a diagnostic
//! - any other fetch error aborts the run, no retries
//! - a missing date column degrades the dataset instead of failing it
//!
//! Fetches run strictly one after another in date order, so diagnostics are
//! emitted in date order too.

use super::dataset::{Dataset, Diagnostic};
use super::date_range::DateRange;
use super::normalize::{coerce_date_column, DateCoercion, DEFAULT_DATE_COLUMN, DEFAULT_DATE_FORMAT};
use super::provider::{DataError, FetchOutcome, Partition, PartitionFetcher};
use super::source::SourcePattern;
use polars::functions::concat_df_diagonal;
use polars::prelude::*;

/// Knobs for the post-assembly normalization step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireOptions {
    pub date_column: String,
    pub date_format: String,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Fetch every partition in `range` and concatenate them in date order.
pub fn acquire(
    fetcher: &dyn PartitionFetcher,
    pattern: &SourcePattern,
    range: &DateRange,
    opts: &AcquireOptions,
) -> Result<Dataset, DataError> {
    tracing::info!(
        fetcher = fetcher.name(),
        start = %range.start(),
        end = %range.end(),
        days = range.len(),
        "acquiring daily partitions"
    );

    let mut diagnostics = Vec::new();

    // Seed: no schema to degrade to if this one is missing.
    let seed_date = range.start();
    let seed_locator = pattern.locator(seed_date);
    let seed = fetcher
        .fetch(&seed_locator)
        .map_err(|e| DataError::SeedFetch {
            date: seed_date,
            source: Box::new(e),
        })?;
    tracing::debug!(date = %seed_date, rows = seed.height(), "seed partition fetched");

    let mut partitions: Vec<Partition> = vec![seed];

    for date in range.dates().skip(1) {
        let locator = pattern.locator(date);
        match FetchOutcome::from(fetcher.fetch(&locator)) {
            FetchOutcome::Fetched(partition) => {
                tracing::debug!(%date, rows = partition.height(), "partition fetched");
                partitions.push(partition);
            }
            FetchOutcome::NotFound => {
                let diag = Diagnostic::MissingPartition { date, locator };
                diag.emit();
                diagnostics.push(diag);
            }
            FetchOutcome::Failed(e) => {
                tracing::error!(%date, error = %e, "partition fetch failed");
                return Err(e);
            }
        }
    }

    let mut frame = concat_partitions(partitions)?;

    if coerce_date_column(&mut frame, &opts.date_column, &opts.date_format)?
        == DateCoercion::ColumnMissing
    {
        let diag = Diagnostic::MissingSchemaColumn {
            column: opts.date_column.clone(),
        };
        diag.emit();
        diagnostics.push(diag);
    }

    tracing::info!(
        rows = frame.height(),
        columns = frame.width(),
        missing_days = diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::MissingPartition { .. }))
            .count(),
        "dataset assembled"
    );

    Ok(Dataset::new(frame, opts.date_column.clone()).with_diagnostics(diagnostics))
}

/// Row-wise concatenation preserving partition order.
///
/// Partitions whose columns differ from the seed are aligned by name: the
/// result holds the union of columns and missing cells are null.
fn concat_partitions(mut partitions: Vec<Partition>) -> Result<DataFrame, DataError> {
    if partitions.len() == 1 {
        return Ok(partitions.remove(0));
    }
    Ok(concat_df_diagonal(&partitions)?)
}
