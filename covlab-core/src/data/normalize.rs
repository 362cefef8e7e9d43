//! Date column coercion.
//!
//! Partitions carry their timestamp as text. After assembly the configured
//! column is parsed with one exact format and replaced by a
//! `Datetime(Milliseconds)` column.

use super::provider::DataError;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Upstream timestamp layout, e.g. `2020-02-24T18:00:00`.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Default name of the timestamp column.
pub const DEFAULT_DATE_COLUMN: &str = "data";

/// What happened to the date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCoercion {
    Coerced,
    AlreadyTyped,
    ColumnMissing,
}

/// Parse one timestamp with an exact format.
///
/// Date-only formats are accepted and resolve to midnight. The ISO date/time
/// separator may be either `T` or a space, regardless of which one `format` names.
pub fn parse_timestamp(raw: &str, format: &str) -> Option<NaiveDateTime> {
    parse_exact(raw, format).or_else(|| {
        alternate_separator(format).and_then(|alt| parse_exact(raw, &alt))
    })
}

fn parse_exact(raw: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// `format` with its date/time separator swapped between `T` and a space.
fn alternate_separator(format: &str) -> Option<String> {
    if format.contains("%dT%H") {
        Some(format.replacen("%dT%H", "%d %H", 1))
    } else if format.contains("%d %H") {
        Some(format.replacen("%d %H", "%dT%H", 1))
    } else {
        None
    }
}

/// Replace `column` with its datetime-typed parse.
///
/// A missing column is not an error: the caller decides how to report it.
/// A value that does not match `format` is.
pub fn coerce_date_column(
    frame: &mut DataFrame,
    column: &str,
    format: &str,
) -> Result<DateCoercion, DataError> {
    let Ok(existing) = frame.column(column) else {
        return Ok(DateCoercion::ColumnMissing);
    };
    if matches!(existing.dtype(), DataType::Datetime(_, _)) {
        return Ok(DateCoercion::AlreadyTyped);
    }

    let text = existing.cast(&DataType::String)?;
    let mut millis: Vec<Option<i64>> = Vec::with_capacity(text.len());
    for value in text.str()?.into_iter() {
        match value {
            None => millis.push(None),
            Some(raw) => {
                let parsed = parse_timestamp(raw.trim(), format).ok_or_else(|| {
                    DataError::DateFormat {
                        column: column.to_string(),
                        value: raw.to_string(),
                        format: format.to_string(),
                    }
                })?;
                millis.push(Some(parsed.and_utc().timestamp_millis()));
            }
        }
    }

    let typed = Series::new(column.into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    frame.with_column(typed)?;
    Ok(DateCoercion::Coerced)
}

/// Read a datetime (or integer) column back as epoch milliseconds.
pub fn column_millis(frame: &DataFrame, column: &str) -> Result<Vec<Option<i64>>, DataError> {
    let col = frame.column(column).map_err(|_| DataError::MissingColumn {
        column: column.to_string(),
    })?;
    let as_int = col.cast(&DataType::Int64)?;
    Ok(as_int.i64()?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_frame(values: &[&str]) -> DataFrame {
        DataFrame::new(vec![
            Column::new("data".into(), values.to_vec()),
            Column::new("deceduti".into(), vec!["1"; values.len()]),
        ])
        .unwrap()
    }

    #[test]
    fn coerces_upstream_timestamps() {
        let mut df = text_frame(&["2020-02-24T18:00:00", "2020-02-25T18:00:00"]);
        let outcome = coerce_date_column(&mut df, "data", DEFAULT_DATE_FORMAT).unwrap();

        assert_eq!(outcome, DateCoercion::Coerced);
        assert_eq!(
            df.column("data").unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );

        let millis = column_millis(&df, "data").unwrap();
        let expected = NaiveDate::from_ymd_opt(2020, 2, 24)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis();
        assert_eq!(millis[0], Some(expected));
        assert_eq!(millis[1], Some(expected + 86_400_000));
    }

    #[test]
    fn missing_column_is_reported_not_raised() {
        let mut df = DataFrame::new(vec![Column::new("deceduti".into(), vec!["1"])]).unwrap();
        let outcome = coerce_date_column(&mut df, "data", DEFAULT_DATE_FORMAT).unwrap();
        assert_eq!(outcome, DateCoercion::ColumnMissing);
        assert_eq!(df.width(), 1);
    }

    #[test]
    fn mismatched_format_is_an_error() {
        let mut df = text_frame(&["24/02/2020 18:00"]);
        let err = coerce_date_column(&mut df, "data", DEFAULT_DATE_FORMAT).unwrap_err();
        assert!(matches!(err, DataError::DateFormat { ref value, .. } if value == "24/02/2020 18:00"));
    }

    #[test]
    fn second_coercion_is_a_no_op() {
        let mut df = text_frame(&["2020-02-24T18:00:00"]);
        coerce_date_column(&mut df, "data", DEFAULT_DATE_FORMAT).unwrap();
        let outcome = coerce_date_column(&mut df, "data", DEFAULT_DATE_FORMAT).unwrap();
        assert_eq!(outcome, DateCoercion::AlreadyTyped);
    }

    #[test]
    fn date_only_format_resolves_to_midnight() {
        let parsed = parse_timestamp("2020-03-01", "%Y-%m-%d").unwrap();
        assert_eq!(parsed.to_string(), "2020-03-01 00:00:00");
    }

    #[test]
    fn either_iso_separator_is_accepted() {
        let mut df = text_frame(&["2020-02-24T18:00:00", "2020-02-25 18:00:00"]);
        coerce_date_column(&mut df, "data", DEFAULT_DATE_FORMAT).unwrap();
        let millis = column_millis(&df, "data").unwrap();
        assert_eq!(millis[1].unwrap() - millis[0].unwrap(), 86_400_000);

        let spaced = "%Y-%m-%d %H:%M:%S";
        assert_eq!(
            parse_timestamp("2020-02-24T18:00:00", spaced),
            parse_timestamp("2020-02-24 18:00:00", spaced)
        );
        assert!(parse_timestamp("2020-02-24T18:00:00", spaced).is_some());
    }
}
