//! Partition fetcher trait and structured error types.
//!
//! The PartitionFetcher trait abstracts over where a day's CSV comes from
//! (the upstream HTTP mirror, a local directory) so the acquisition loop can be
//! driven by a scripted fetcher in tests.

use chrono::NaiveDate;
use polars::prelude::*;
use std::io::Cursor;
use thiserror::Error;

/// One day's table, as published upstream. Every column is text-typed.
pub type Partition = DataFrame;

/// Structured error types for data operations.
///
/// These are designed to be displayable in CLI output and in log events.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("partition not published: {locator}")]
    NotFound { locator: String },

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for {locator}")]
    Http { status: u16, locator: String },

    #[error("malformed partition {locator}: {reason}")]
    Parse { locator: String, reason: String },

    #[error("seed partition for {date} could not be fetched: {source}")]
    SeedFetch {
        date: NaiveDate,
        #[source]
        source: Box<DataError>,
    },

    #[error("invalid date range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("value '{value}' in column '{column}' does not match format '{format}'")]
    DateFormat {
        column: String,
        value: String,
        format: String,
    },

    #[error("column '{column}' not found")]
    MissingColumn { column: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataframe error: {0}")]
    Polars(#[from] PolarsError),
}

impl DataError {
    /// True for the one failure kind the acquisition loop may skip over.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound { .. })
    }
}

/// Result of one iteration of the acquisition loop.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(Partition),
    NotFound,
    Failed(DataError),
}

impl From<Result<Partition, DataError>> for FetchOutcome {
    fn from(result: Result<Partition, DataError>) -> Self {
        match result {
            Ok(partition) => FetchOutcome::Fetched(partition),
            Err(e) if e.is_not_found() => FetchOutcome::NotFound,
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}

/// Trait for partition sources (HTTP mirror, local directory, etc).
///
/// Implementations return `DataError::NotFound` when the locator does not
/// exist yet; every other error is treated as fatal by the caller.
pub trait PartitionFetcher {
    /// Human-readable name of this fetcher.
    fn name(&self) -> &str;

    /// Fetch and parse the partition behind `locator`.
    fn fetch(&self, locator: &str) -> Result<Partition, DataError>;
}

/// Parse a CSV body with a header row into a partition.
///
/// Schema inference is disabled so every column is read as text: a column
/// that is empty on one day and numeric on the next never conflicts on
/// concatenation.
pub fn parse_partition(body: Vec<u8>, locator: &str) -> Result<Partition, DataError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(body))
        .finish()
        .map_err(|e| DataError::Parse {
            locator: locator.to_string(),
            reason: e.to_string(),
        })
}
