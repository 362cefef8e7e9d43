//! Dataset persistence: delimited text export, Parquet export, CSV reload.
//!
//! Writes are atomic (write to `.tmp`, rename into place). Datetime values are
//! written with the same format the engine parses, so a persisted CSV reloads
//! into an identical dataset.

use super::dataset::{Dataset, Diagnostic};
use super::normalize::{coerce_date_column, DateCoercion};
use super::provider::DataError;
use super::acquire::AcquireOptions;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// On-disk format of a persisted dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistFormat {
    Csv,
    Parquet,
}

impl PersistFormat {
    pub fn extension(self) -> &'static str {
        match self {
            PersistFormat::Csv => "csv",
            PersistFormat::Parquet => "parquet",
        }
    }
}

/// Write `dataset` to `{dir}/{stem}.{ext}` and return the final path.
pub fn persist(
    dataset: &Dataset,
    dir: &Path,
    stem: &str,
    format: PersistFormat,
    date_format: &str,
) -> Result<PathBuf, DataError> {
    let path = dir.join(format!("{stem}.{}", format.extension()));
    match format {
        PersistFormat::Csv => write_csv(dataset, &path, date_format)?,
        PersistFormat::Parquet => write_parquet(dataset, &path)?,
    }
    tracing::info!(path = %path.display(), rows = dataset.height(), "dataset persisted");
    Ok(path)
}

/// Header row of column names, then one line per record.
pub fn write_csv(dataset: &Dataset, path: &Path, date_format: &str) -> Result<(), DataError> {
    write_atomic(path, |file| {
        let mut frame = dataset.frame().clone();
        CsvWriter::new(file)
            .include_header(true)
            .with_datetime_format(Some(date_format.to_string()))
            .finish(&mut frame)?;
        Ok(())
    })
}

pub fn write_parquet(dataset: &Dataset, path: &Path) -> Result<(), DataError> {
    write_atomic(path, |file| {
        let mut frame = dataset.frame().clone();
        ParquetWriter::new(file).finish(&mut frame)?;
        Ok(())
    })
}

/// Reload a persisted CSV, re-applying the date coercion.
pub fn read_csv(path: &Path, opts: &AcquireOptions) -> Result<Dataset, DataError> {
    let mut frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let mut diagnostics = Vec::new();
    if coerce_date_column(&mut frame, &opts.date_column, &opts.date_format)?
        == DateCoercion::ColumnMissing
    {
        let diag = Diagnostic::MissingSchemaColumn {
            column: opts.date_column.clone(),
        };
        diag.emit();
        diagnostics.push(diag);
    }

    Ok(Dataset::new(frame, opts.date_column.clone()).with_diagnostics(diagnostics))
}

fn write_atomic<F>(path: &Path, write: F) -> Result<(), DataError>
where
    F: FnOnce(&mut File) -> Result<(), DataError>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("tmp");
    let mut file = File::create(&tmp_path)?;
    if let Err(e) = write(&mut file) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    drop(file);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        DataError::Io(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> Dataset {
        let mut frame = DataFrame::new(vec![
            Column::new("data".into(), vec!["2020-02-24T18:00:00", "2020-02-25T18:00:00"]),
            Column::new("deceduti".into(), vec!["7", "10"]),
        ])
        .unwrap();
        coerce_date_column(&mut frame, "data", "%Y-%m-%dT%H:%M:%S").unwrap();
        Dataset::new(frame, "data")
    }

    #[test]
    fn csv_has_header_and_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = persist(
            &sample_dataset(),
            dir.path(),
            "andamento_nazionale_totale",
            PersistFormat::Csv,
            "%Y-%m-%dT%H:%M:%S",
        )
        .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "data,deceduti");
        assert_eq!(lines[1], "2020-02-24T18:00:00,7");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn csv_reload_restores_typed_dates() {
        let dir = tempfile::tempdir().unwrap();
        let original = sample_dataset();
        let path = dir.path().join("nested/out.csv");
        write_csv(&original, &path, "%Y-%m-%dT%H:%M:%S").unwrap();

        let reloaded = read_csv(&path, &AcquireOptions::default()).unwrap();

        assert!(reloaded.is_date_typed());
        assert_eq!(
            reloaded.timestamps_millis().unwrap(),
            original.timestamps_millis().unwrap()
        );
    }

    #[test]
    fn parquet_export_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = persist(
            &sample_dataset(),
            dir.path(),
            "andamento_regionale_totale",
            PersistFormat::Parquet,
            "%Y-%m-%dT%H:%M:%S",
        )
        .unwrap();
        assert!(path.ends_with("andamento_regionale_totale.parquet"));
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }
}
