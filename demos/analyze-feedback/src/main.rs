//! Offline feedback analysis
//!
//! Usage: analyze-feedback [FEEDBACK_LOG] [SNAPSHOT_JSON]
//!
//! Recomputes the snapshot from the whole log, replaces the JSON snapshot and
//! then writes `feedback_analysis.txt` next to it. Both files are replaced
//! atomically. A failed analysis leaves both untouched; a failed report write
//! leaves the new snapshot next to the previous report.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use feedback::{CsvFeedbackStore, FeedbackAggregator, SnapshotFile};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let log = PathBuf::from(args.next().unwrap_or_else(|| "feedback.csv".to_string()));
    let snapshot_path =
        PathBuf::from(args.next().unwrap_or_else(|| "feedback_analysis.json".to_string()));

    let store = CsvFeedbackStore::new(log);
    let target = SnapshotFile::new(&snapshot_path);

    let snapshot = FeedbackAggregator::new()
        .refresh(&store, &target)
        .with_context(|| format!("analysis of {} failed", store.path().display()))?;

    let report = snapshot.render_report();
    let report_path = snapshot_path.with_file_name("feedback_analysis.txt");
    write_replacing(&report_path, report.as_bytes())
        .with_context(|| format!("Failed to write {}", report_path.display()))?;

    println!("📊 Feedback analysis of {}", store.path().display());
    println!("   ─────────────────────────────────");
    print!("{report}");
    println!();
    println!("   ✓ Snapshot: {}", target.path().display());
    println!("   ✓ Report:   {}", report_path.display());
    Ok(())
}

fn write_replacing(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("txt.tmp");
    std::fs::write(&tmp, bytes)
        .and_then(|_| std::fs::rename(&tmp, path))
        .inspect_err(|_| {
            let _ = std::fs::remove_file(&tmp);
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn report_is_replaced_without_leftovers() {
        let dir = tempdir().unwrap();
        let report = dir.path().join("feedback_analysis.txt");
        std::fs::write(&report, "old report").unwrap();

        write_replacing(&report, b"Average Rating: 4.0\n").unwrap();

        assert_eq!(std::fs::read_to_string(&report).unwrap(), "Average Rating: 4.0\n");
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("feedback_analysis.txt")]);
    }

    #[test]
    fn failed_rename_keeps_previous_report() {
        let dir = tempdir().unwrap();
        // a non-empty directory at the target cannot be renamed over
        let report = dir.path().join("feedback_analysis.txt");
        std::fs::create_dir(&report).unwrap();
        std::fs::write(report.join("keep"), "previous").unwrap();

        assert!(write_replacing(&report, b"new").is_err());
        assert_eq!(std::fs::read_to_string(report.join("keep")).unwrap(), "previous");
        assert!(!report.with_extension("txt.tmp").exists());
    }
}
