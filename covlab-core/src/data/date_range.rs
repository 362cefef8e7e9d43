//! Inclusive calendar-day ranges.

use super::provider::DataError;
use chrono::{Duration, NaiveDate};

/// First day the upstream published data.
pub const DEFAULT_START_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2020, 2, 24) {
    Some(date) => date,
    None => panic!("invalid default start date"),
};

/// Inclusive, strictly increasing sequence of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range; fails when `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DataError> {
        if end < start {
            return Err(DataError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range (always at least one).
    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Never true: a range holds at least its start day.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate the days in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.len() as i64).map(move |offset| start + Duration::days(offset))
    }
}
