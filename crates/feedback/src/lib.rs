//! Feedback log and aggregation
//!
//! Append-only CSV feedback log, a batch aggregator that derives the average
//! rating and the most frequent comments, and the atomically replaced JSON
//! snapshot that prompt construction reads back.

mod aggregate;
mod error;
mod schema;
mod snapshot;
mod store;

pub use aggregate::{FeedbackAggregator, TOP_FEEDBACK_LIMIT};
pub use error::{FeedbackError, Result};
pub use schema::{AggregateSnapshot, FeedbackCount, FeedbackRecord, LOG_HEADER};
pub use snapshot::SnapshotFile;
pub use store::{CsvFeedbackStore, FeedbackStore, InMemoryFeedbackStore, Row};
