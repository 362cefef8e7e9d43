//! Upstream locator patterns for the daily CSV partitions.

use chrono::NaiveDate;
use std::fmt;

/// Default mirror of the Civil Protection Department repository.
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/pcm-dpc/COVID-19/master";

/// Which of the two published daily series to acquire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    National,
    Regional,
}

impl DatasetKind {
    /// Path between the base URL and the `YYYYMMDD` stamp.
    pub fn path_prefix(self) -> &'static str {
        match self {
            DatasetKind::National => {
                "/dati-andamento-nazionale/dpc-covid19-ita-andamento-nazionale-"
            }
            DatasetKind::Regional => "/dati-regioni/dpc-covid19-ita-regioni-",
        }
    }

    /// File stem used when the assembled dataset is persisted.
    pub fn file_stem(self) -> &'static str {
        match self {
            DatasetKind::National => "andamento_nazionale_totale",
            DatasetKind::Regional => "andamento_regionale_totale",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::National => write!(f, "national"),
            DatasetKind::Regional => write!(f, "regional"),
        }
    }
}

/// Template that turns a calendar date into a fetch locator.
///
/// Locator layout: `{base_url}{path_prefix}{YYYYMMDD}{extension}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePattern {
    base_url: String,
    path_prefix: String,
    extension: String,
}

impl SourcePattern {
    pub fn new(base_url: impl Into<String>, path_prefix: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            path_prefix: path_prefix.into(),
            extension: ".csv".to_string(),
        }
    }

    /// Pattern for one of the upstream dataset kinds.
    pub fn for_kind(base_url: impl Into<String>, kind: DatasetKind) -> Self {
        Self::new(base_url, kind.path_prefix())
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Locator for the partition published on `date`.
    pub fn locator(&self, date: NaiveDate) -> String {
        format!(
            "{}{}{}{}",
            self.base_url,
            self.path_prefix,
            date.format("%Y%m%d"),
            self.extension
        )
    }
}
