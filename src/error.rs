use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single overview query. Neither is retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverviewError {
    /// Nothing was indexed: no circle or no dated snapshot survived loading.
    #[error("static dataset contains no circle or date records")]
    EmptyCorpus,
    #[error("no records found for circle {circle_id} between {start} and {end}")]
    NoRecordsInRange {
        circle_id: u64,
        start: String,
        end: String,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read snapshot dir {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read snapshot {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse snapshot {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
