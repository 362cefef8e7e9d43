//! Offline fetcher backed by a local mirror directory.
//!
//! The locator's path is resolved against the mirror root, longest suffix
//! first, so a checkout of the upstream repository (files under
//! `dati-regioni/` and friends) or a flat directory of daily CSVs can stand in
//! for the network.

use super::provider::{parse_partition, DataError, Partition, PartitionFetcher};
use std::fs;
use std::path::PathBuf;

pub struct LocalMirrorFetcher {
    root: PathBuf,
}

impl LocalMirrorFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// First existing file among the locator's path suffixes joined onto the
    /// root. Falls back to the bare file name when none exists.
    fn resolve(&self, locator: &str) -> PathBuf {
        let segments = path_segments(locator);
        for start in 0..segments.len() {
            let candidate = segments[start..]
                .iter()
                .fold(self.root.clone(), |path, seg| path.join(seg));
            if candidate.is_file() {
                return candidate;
            }
        }
        match segments.last() {
            Some(file_name) => self.root.join(file_name),
            None => self.root.clone(),
        }
    }
}

/// Path segments of a locator, without scheme and host. Empty, `.` and `..`
/// segments are dropped so lookups stay under the root.
fn path_segments(locator: &str) -> Vec<&str> {
    let path = match locator.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map_or("", |(_, path)| path),
        None => locator,
    };
    path.split('/')
        .filter(|seg| !seg.is_empty() && *seg != "." && *seg != "..")
        .collect()
}

impl PartitionFetcher for LocalMirrorFetcher {
    fn name(&self) -> &str {
        "local_mirror"
    }

    fn fetch(&self, locator: &str) -> Result<Partition, DataError> {
        let path = self.resolve(locator);
        if !path.is_file() {
            return Err(DataError::NotFound {
                locator: path.display().to_string(),
            });
        }
        let body = fs::read(&path)?;
        parse_partition(body, &path.display().to_string())
    }
}
