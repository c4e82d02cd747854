use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use feedback::{
    AggregateSnapshot, CsvFeedbackStore, FeedbackAggregator, FeedbackError, FeedbackRecord,
    FeedbackStore, InMemoryFeedbackStore, Row, SnapshotFile, TOP_FEEDBACK_LIMIT,
};
use tempfile::tempdir;

/// Delegates to an inner store until `fail` is flipped.
struct FlakyStore<S> {
    inner: S,
    fail: AtomicBool,
}

impl<S: FeedbackStore> FeedbackStore for FlakyStore<S> {
    fn append(&mut self, record: &FeedbackRecord) -> feedback::Result<()> {
        self.inner.append(record)
    }

    fn read_all(&self) -> feedback::Result<Vec<Row>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(FeedbackError::StorageUnavailable {
                path: PathBuf::from("flaky.csv"),
                source: io::Error::new(io::ErrorKind::Other, "medium vanished"),
            });
        }
        self.inner.read_all()
    }
}

#[test]
fn test_append_then_read_returns_record_last() {
    let dir = tempdir().unwrap();
    let mut store = CsvFeedbackStore::new(dir.path().join("feedback.csv"));

    store
        .append(&FeedbackRecord::new("first", "recommendation", 4, "ok"))
        .unwrap();

    let tricky = FeedbackRecord::new(
        "shop, with \"quotes\"",
        "prioritization",
        "5",
        "line one\nline two, trailing space ",
    );
    store.append(&tricky).unwrap();

    let rows = store.read_all().unwrap();
    let last = rows.last().unwrap();
    assert_eq!(last, &tricky.fields().to_vec());
}

#[test]
fn test_scenario_average_and_common_feedback() {
    let dir = tempdir().unwrap();
    let mut store = CsvFeedbackStore::new(dir.path().join("feedback.csv"));

    store.append(&FeedbackRecord::new("p1", "rec", "5", "too generic")).unwrap();
    store.append(&FeedbackRecord::new("p1", "rec", "3", "too generic")).unwrap();
    store.append(&FeedbackRecord::new("p2", "task", "bad", "")).unwrap();

    let snapshot = FeedbackAggregator::new().run(&store).unwrap();
    assert_eq!(snapshot.average_rating, 4.0);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "average_rating": 4.0,
            "common_feedback": [{"feedback": "too generic", "count": 2}]
        })
    );
}

#[test]
fn test_empty_store_yields_zero_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("feedback.csv");
    let aggregator = FeedbackAggregator::new();

    let missing = CsvFeedbackStore::new(&path);
    assert_eq!(aggregator.run(&missing).unwrap(), AggregateSnapshot::empty());

    std::fs::write(&path, "project,context,rating,comment\n").unwrap();
    let header_only = CsvFeedbackStore::new(&path);
    assert_eq!(aggregator.run(&header_only).unwrap(), AggregateSnapshot::empty());
}

#[test]
fn test_repeated_runs_are_identical() {
    let dir = tempdir().unwrap();
    let mut store = CsvFeedbackStore::new(dir.path().join("feedback.csv"));
    for (i, comment) in ["slow", "slow", "great", "", "vague"].iter().enumerate() {
        store
            .append(&FeedbackRecord::new("p", "rec", (i % 5) + 1, *comment))
            .unwrap();
    }

    let aggregator = FeedbackAggregator::new();
    let first = aggregator.run(&store).unwrap();
    let second = aggregator.run(&store).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_top_feedback_bounded_and_non_increasing() {
    let dir = tempdir().unwrap();
    let mut store = CsvFeedbackStore::new(dir.path().join("feedback.csv"));

    for theme in 0..8 {
        for _ in 0..=(theme % 3) {
            store
                .append(&FeedbackRecord::new("p", "rec", 3, format!("theme {theme}")))
                .unwrap();
        }
    }

    let snapshot = FeedbackAggregator::new().run(&store).unwrap();
    assert_eq!(snapshot.top_feedback.len(), TOP_FEEDBACK_LIMIT);
    assert!(snapshot
        .top_feedback
        .windows(2)
        .all(|w| w[0].count >= w[1].count));
    // themes 2 and 5 both appear three times; 2 was seen first
    assert_eq!(snapshot.top_feedback[0].feedback, "theme 2");
    assert_eq!(snapshot.top_feedback[1].feedback, "theme 5");
}

#[test]
fn test_refresh_persists_snapshot() {
    let dir = tempdir().unwrap();
    let mut store = CsvFeedbackStore::new(dir.path().join("feedback.csv"));
    let target = SnapshotFile::new(dir.path().join("feedback_analysis.json"));

    store.append(&FeedbackRecord::new("p", "rec", 2, "Vague")).unwrap();

    let snapshot = FeedbackAggregator::new().refresh(&store, &target).unwrap();
    assert_eq!(target.load().unwrap(), Some(snapshot));
}

#[test]
fn test_failed_refresh_keeps_previous_snapshot() {
    let dir = tempdir().unwrap();
    let target = SnapshotFile::new(dir.path().join("feedback_analysis.json"));
    let mut store = FlakyStore {
        inner: CsvFeedbackStore::new(dir.path().join("feedback.csv")),
        fail: AtomicBool::new(false),
    };
    store.append(&FeedbackRecord::new("p", "rec", 5, "great")).unwrap();

    let aggregator = FeedbackAggregator::new();
    aggregator.refresh(&store, &target).unwrap();
    let before = std::fs::read(target.path()).unwrap();

    store.append(&FeedbackRecord::new("p", "rec", 1, "awful")).unwrap();
    store.fail.store(true, Ordering::SeqCst);

    let err = aggregator.refresh(&store, &target).unwrap_err();
    assert!(matches!(err, FeedbackError::StorageUnavailable { .. }));
    assert_eq!(std::fs::read(target.path()).unwrap(), before);
}

#[test]
fn test_log_replaced_by_directory_keeps_previous_snapshot() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("feedback.csv");
    let target = SnapshotFile::new(dir.path().join("feedback_analysis.json"));

    let mut store = CsvFeedbackStore::new(&log);
    store.append(&FeedbackRecord::new("p", "rec", 4, "fine")).unwrap();
    let aggregator = FeedbackAggregator::new();
    let good = aggregator.refresh(&store, &target).unwrap();

    std::fs::remove_file(&log).unwrap();
    std::fs::create_dir(&log).unwrap();

    assert!(aggregator.refresh(&store, &target).is_err());
    assert_eq!(target.load().unwrap(), Some(good));
}

#[test]
fn test_concurrent_appends_keep_whole_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("feedback.csv");
    CsvFeedbackStore::new(&path)
        .append(&FeedbackRecord::new("seed", "rec", 3, ""))
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let path = path.clone();
            std::thread::spawn(move || {
                let mut store = CsvFeedbackStore::new(path);
                for i in 0..50 {
                    store
                        .append(&FeedbackRecord::new(format!("t{t}-{i}"), "rec", 4, "ok"))
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let rows = CsvFeedbackStore::new(&path).read_all().unwrap();
    assert_eq!(rows.len(), 1 + 1 + 4 * 50);
    assert!(rows.iter().all(|r| r.len() == 4));

    let snapshot = FeedbackAggregator::new().aggregate(&rows);
    assert_eq!(snapshot.top_feedback[0].count, 200);
}

fn row(fields: &[&str]) -> Row {
    fields.iter().map(|f| f.to_string()).collect()
}

#[test]
fn test_headerless_log_loses_first_data_row() {
    // the first row is always consumed as the header
    let store = InMemoryFeedbackStore::from_rows(vec![
        row(&["p1", "rec", "1", "awful"]),
        row(&["p2", "rec", "5", "great"]),
    ]);

    let snapshot = FeedbackAggregator::new().run(&store).unwrap();
    assert_eq!(snapshot.average_rating, 5.0);
    assert_eq!(snapshot.top_feedback.len(), 1);
    assert_eq!(snapshot.top_feedback[0].feedback, "great");

    let single = InMemoryFeedbackStore::from_rows(vec![row(&["p1", "rec", "4", "fine"])]);
    assert_eq!(
        FeedbackAggregator::new().run(&single).unwrap(),
        AggregateSnapshot::empty()
    );
}

#[test]
fn test_ragged_rows_are_skipped_through_run() {
    let store = InMemoryFeedbackStore::from_rows(vec![
        row(&["project", "context", "rating", "comment"]),
        row(&["p1"]),
        row(&["p2", "rec", "2"]),
        row(&["p3", "rec", "4", "slow", "extra"]),
        row(&[]),
    ]);

    let snapshot = FeedbackAggregator::new().run(&store).unwrap();
    assert_eq!(snapshot.average_rating, 4.0);
    assert_eq!(snapshot.top_feedback[0].feedback, "slow");
}

#[test]
fn test_csv_store_reports_its_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("feedback.csv");
    assert_eq!(CsvFeedbackStore::new(&path).path(), path.as_path());
}
