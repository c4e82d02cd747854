use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedbackError {
    /// The feedback log could not be opened, read or appended to.
    #[error("feedback log unavailable at {}: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot I/O failed at {}: {source}", .path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot at {} is not a valid document: {source}", .path.display())]
    SnapshotFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, FeedbackError>;
