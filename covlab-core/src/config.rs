//! Application configuration, loaded from an optional TOML file.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! upstream settings.

use crate::chart::fields::{REGIONAL_DEFAULT_Y_FIELD, REGION_NAME_FIELD};
use crate::data::date_range::DEFAULT_START_DATE;
use crate::data::{
    AcquireOptions, DataError, DatasetKind, DateRange, SourcePattern, DEFAULT_BASE_URL,
    DEFAULT_DATE_COLUMN, DEFAULT_DATE_FORMAT,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the upstream raw-file mirror.
    pub base_url: String,

    /// First day of every acquisition range.
    pub start_date: NaiveDate,

    /// Timestamp column coerced after assembly.
    pub date_column: String,

    /// Exact chrono format of the timestamp column.
    pub date_format: String,

    /// Where datasets and charts are written.
    pub output_dir: PathBuf,

    /// Grouping column of the per-region chart.
    pub group_by: String,

    /// Plotted quantity of the per-region chart.
    pub regional_y: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            start_date: DEFAULT_START_DATE,
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            output_dir: PathBuf::from("output"),
            group_by: REGION_NAME_FIELD.to_string(),
            regional_y: REGIONAL_DEFAULT_Y_FIELD.to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, DataError> {
        toml::from_str(content).map_err(|e| DataError::Config(format!("parse config TOML: {e}")))
    }

    /// Load from `path`, or return the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, DataError> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    DataError::Config(format!("read config {}: {e}", path.display()))
                })?;
                Self::from_toml(&content)
            }
        }
    }

    pub fn source_pattern(&self, kind: DatasetKind) -> SourcePattern {
        SourcePattern::for_kind(self.base_url.clone(), kind)
    }

    pub fn acquire_options(&self) -> AcquireOptions {
        AcquireOptions {
            date_column: self.date_column.clone(),
            date_format: self.date_format.clone(),
        }
    }

    /// Range from the configured start to `end` (inclusive).
    pub fn date_range(&self, end: NaiveDate) -> Result<DateRange, DataError> {
        DateRange::new(self.start_date, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.start_date, NaiveDate::from_ymd_opt(2020, 2, 24).unwrap());
        assert_eq!(cfg.date_column, "data");
    }

    #[test]
    fn partial_override() {
        let cfg = AppConfig::from_toml(
            r#"
base_url = "http://localhost:8000"
start_date = "2020-03-01"
regional_y = "deceduti"
"#,
        )
        .unwrap();
        assert_eq!(cfg.base_url, "http://localhost:8000");
        assert_eq!(cfg.regional_y, "deceduti");
        assert_eq!(cfg.group_by, "denominazione_regione");

        let range = cfg.date_range(NaiveDate::from_ymd_opt(2020, 3, 3).unwrap()).unwrap();
        assert_eq!(range.len(), 3);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("start_date = 12").unwrap_err();
        assert!(matches!(err, DataError::Config(_)));
    }

    #[test]
    fn load_without_path_is_default() {
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn pattern_uses_configured_base() {
        let cfg = AppConfig {
            base_url: "http://m".into(),
            ..AppConfig::default()
        };
        let locator = cfg
            .source_pattern(DatasetKind::Regional)
            .locator(NaiveDate::from_ymd_opt(2020, 2, 24).unwrap());
        assert_eq!(locator, "http://m/dati-regioni/dpc-covid19-ita-regioni-20200224.csv");
    }
}
