use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, error, info};

use crate::{AggregateSnapshot, FeedbackCount, FeedbackStore, Result, Row, SnapshotFile};

/// Maximum number of comments kept in `AggregateSnapshot::top_feedback`.
pub const TOP_FEEDBACK_LIMIT: usize = 5;

const MIN_FIELDS: usize = 4;
const RATING_FIELD: usize = 2;
const COMMENT_FIELD: usize = 3;

/// Batch job deriving an `AggregateSnapshot` from the full feedback log.
///
/// Stateless: every run re-reads the log from the start and never consults a
/// previously persisted snapshot.
#[derive(Clone, Copy, Debug)]
pub struct FeedbackAggregator {
    top_k: usize,
}

impl Default for FeedbackAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackAggregator {
    pub fn new() -> Self {
        Self {
            top_k: TOP_FEEDBACK_LIMIT,
        }
    }

    /// Read the whole store and aggregate it. No side effects on the store.
    pub fn run<S: FeedbackStore + ?Sized>(&self, store: &S) -> Result<AggregateSnapshot> {
        let rows = store.read_all()?;
        Ok(self.aggregate(&rows))
    }

    /// Aggregate raw rows. The first row is always treated as the header.
    pub fn aggregate(&self, rows: &[Row]) -> AggregateSnapshot {
        if rows.len() < 2 {
            return AggregateSnapshot::empty();
        }

        let mut rating_sum = 0.0_f64;
        let mut rating_count = 0_u64;
        let mut dropped = 0_usize;

        // first-seen order is the tie breaker, so counts live in a Vec
        let mut counts: Vec<FeedbackCount> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for row in &rows[1..] {
            if row.len() < MIN_FIELDS {
                dropped += 1;
                continue;
            }

            if let Some(rating) = parse_rating(&row[RATING_FIELD]) {
                rating_sum += rating;
                rating_count += 1;
            }

            let comment = row[COMMENT_FIELD].trim().to_lowercase();
            if comment.is_empty() {
                continue;
            }
            match positions.entry(comment) {
                Entry::Occupied(slot) => counts[*slot.get()].count += 1,
                Entry::Vacant(slot) => {
                    counts.push(FeedbackCount {
                        feedback: slot.key().clone(),
                        count: 1,
                    });
                    slot.insert(counts.len() - 1);
                }
            }
        }

        if dropped > 0 {
            debug!(dropped, "skipped malformed feedback rows");
        }

        // sort_by is stable: equal counts keep first-seen order
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts.truncate(self.top_k);

        AggregateSnapshot {
            average_rating: mean_rounded(rating_sum, rating_count),
            top_feedback: counts,
        }
    }

    /// Run the aggregation and atomically replace `target` with the result.
    ///
    /// On any failure the error is logged and returned, and `target` is left
    /// exactly as it was.
    pub fn refresh<S: FeedbackStore + ?Sized>(
        &self,
        store: &S,
        target: &SnapshotFile,
    ) -> Result<AggregateSnapshot> {
        let outcome = self.run(store).and_then(|snapshot| {
            target.persist(&snapshot)?;
            Ok(snapshot)
        });

        match outcome {
            Ok(snapshot) => {
                info!(
                    average_rating = snapshot.average_rating,
                    themes = snapshot.top_feedback.len(),
                    path = %target.path().display(),
                    "feedback snapshot refreshed"
                );
                Ok(snapshot)
            }
            Err(e) => {
                error!(
                    error = %e,
                    path = %target.path().display(),
                    "feedback aggregation failed, previous snapshot kept"
                );
                Err(e)
            }
        }
    }
}

// Plain digit strings only: no sign, no whitespace, no length limit.
fn parse_rating(field: &str) -> Option<f64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse::<f64>().ok()
}

fn mean_rounded(sum: f64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let mean = sum / count as f64;
    (mean * 100.0).round() / 100.0
}
