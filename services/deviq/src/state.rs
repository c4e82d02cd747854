use std::sync::Arc;
use tokio::sync::Mutex;

use chrono::{DateTime, Utc};
use feedback::{CsvFeedbackStore, FeedbackAggregator, FeedbackStore, SnapshotFile};

use crate::config::AppConfig;
use crate::provider::LLMProvider;

pub type SharedState = Arc<AppState>;
pub type SharedStore = Arc<Mutex<Box<dyn FeedbackStore>>>;

#[derive(Clone)]
pub struct AppState {
    pub feedback: SharedStore,
    pub snapshot: SnapshotFile,
    pub aggregator: FeedbackAggregator,
    pub provider: Arc<dyn LLMProvider>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(cfg: &AppConfig, provider: Arc<dyn LLMProvider>) -> Self {
        let store = CsvFeedbackStore::new(cfg.feedback_log.clone());
        Self::with_store(Box::new(store), SnapshotFile::new(cfg.snapshot_path.clone()), provider)
    }

    pub fn with_store(
        store: Box<dyn FeedbackStore>,
        snapshot: SnapshotFile,
        provider: Arc<dyn LLMProvider>,
    ) -> Self {
        Self {
            feedback: Arc::new(Mutex::new(store)),
            snapshot,
            aggregator: FeedbackAggregator::new(),
            provider,
            started_at: Utc::now(),
        }
    }
}
