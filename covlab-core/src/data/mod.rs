//! Data acquisition, assembly and persistence

pub mod acquire;
pub mod dataset;
pub mod date_range;
pub mod http;
pub mod local;
pub mod normalize;
pub mod persist;
pub mod provider;
pub mod source;

pub use acquire::{acquire, AcquireOptions};
pub use dataset::{Dataset, Diagnostic, GroupedDataset};
pub use date_range::DateRange;
pub use http::HttpFetcher;
pub use local::LocalMirrorFetcher;
pub use normalize::{DEFAULT_DATE_COLUMN, DEFAULT_DATE_FORMAT};
pub use persist::{persist, read_csv, PersistFormat};
pub use provider::{DataError, FetchOutcome, Partition, PartitionFetcher};
pub use source::{DatasetKind, SourcePattern, DEFAULT_BASE_URL};
