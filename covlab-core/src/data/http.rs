//! HTTP partition fetcher.
//!
//! Downloads one CSV per request from the upstream raw-file mirror. A 404 is
//! the upstream's way of saying "not published yet" and maps to
//! `DataError::NotFound`; everything else is surfaced as a fatal error.
//! There are no retries.

use super::provider::{parse_partition, DataError, Partition, PartitionFetcher};
use reqwest::StatusCode;
use std::time::Duration;

/// Blocking HTTP fetcher.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, DataError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("covlab/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

/// Map a non-success status onto the error taxonomy.
fn status_error(status: StatusCode, locator: &str) -> DataError {
    if status == StatusCode::NOT_FOUND {
        DataError::NotFound {
            locator: locator.to_string(),
        }
    } else {
        DataError::Http {
            status: status.as_u16(),
            locator: locator.to_string(),
        }
    }
}

impl PartitionFetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, locator: &str) -> Result<Partition, DataError> {
        let resp = self
            .client
            .get(locator)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(status, locator));
        }

        let body = resp
            .bytes()
            .map_err(|e| DataError::NetworkUnreachable(format!("reading body of {locator}: {e}")))?;

        parse_partition(body.to_vec(), locator)
    }
}
