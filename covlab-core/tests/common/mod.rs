//! Shared fixtures: an in-memory partition fetcher standing in for the mirror.

use chrono::NaiveDate;
use covlab_core::data::provider::parse_partition;
use covlab_core::data::{DataError, Partition, PartitionFetcher, SourcePattern};
use std::collections::HashMap;

pub struct MemoryFetcher {
    bodies: HashMap<String, String>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self {
            bodies: HashMap::new(),
        }
    }

    pub fn publish(&mut self, pattern: &SourcePattern, date: NaiveDate, body: impl Into<String>) {
        self.bodies.insert(pattern.locator(date), body.into());
    }
}

impl PartitionFetcher for MemoryFetcher {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, locator: &str) -> Result<Partition, DataError> {
        match self.bodies.get(locator) {
            Some(body) => parse_partition(body.as_bytes().to_vec(), locator),
            None => Err(DataError::NotFound {
                locator: locator.to_string(),
            }),
        }
    }
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 2, d).unwrap()
}

pub fn pattern() -> SourcePattern {
    SourcePattern::new("mem", "/dpc-covid19-ita-andamento-nazionale-")
}

pub fn millis(date: NaiveDate, hour: u32) -> i64 {
    date.and_hms_opt(hour, 0, 0).unwrap().and_utc().timestamp_millis()
}
