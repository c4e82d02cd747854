use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{AggregateSnapshot, FeedbackError, Result};

/// JSON document holding the most recent `AggregateSnapshot`.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so readers see either the previous document or the new one.
#[derive(Clone, Debug)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when no snapshot has been persisted yet.
    pub fn load(&self) -> Result<Option<AggregateSnapshot>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(FeedbackError::Snapshot {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| FeedbackError::SnapshotFormat {
                path: self.path.clone(),
                source,
            })
    }

    pub fn load_or_empty(&self) -> Result<AggregateSnapshot> {
        Ok(self.load()?.unwrap_or_default())
    }

    pub fn persist(&self, snapshot: &AggregateSnapshot) -> Result<()> {
        let bytes =
            serde_json::to_vec_pretty(snapshot).map_err(|source| FeedbackError::SnapshotFormat {
                path: self.path.clone(),
                source,
            })?;

        let tmp_path = self.tmp_path();
        let written = write_synced(&tmp_path, &bytes).and_then(|_| fs::rename(&tmp_path, &self.path));

        if let Err(source) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(FeedbackError::Snapshot {
                path: self.path.clone(),
                source,
            });
        }
        Ok(())
    }

    // Same directory as the target so the rename never crosses filesystems.
    fn tmp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string());
        self.path
            .with_file_name(format!(".{name}.tmp_{}", Uuid::new_v4()))
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut f = File::create(path)?;
    f.write_all(bytes)?;
    f.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeedbackCount;
    use tempfile::tempdir;

    fn sample() -> AggregateSnapshot {
        AggregateSnapshot {
            average_rating: 3.25,
            top_feedback: vec![FeedbackCount {
                feedback: "needs more detail".into(),
                count: 4,
            }],
        }
    }

    #[test]
    fn load_missing_is_none() {
        let dir = tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("analysis.json"));
        assert!(file.load().unwrap().is_none());
        assert_eq!(file.load_or_empty().unwrap(), AggregateSnapshot::empty());
    }

    #[test]
    fn persist_replaces_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("analysis.json"));

        file.persist(&AggregateSnapshot::empty()).unwrap();
        file.persist(&sample()).unwrap();

        assert_eq!(file.load().unwrap(), Some(sample()));
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn persist_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("gone").join("analysis.json"));

        let err = file.persist(&sample()).unwrap_err();
        assert!(matches!(err, FeedbackError::Snapshot { .. }));
    }

    #[test]
    fn garbage_document_is_a_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        fs::write(&path, "{ not json").unwrap();

        let err = SnapshotFile::new(&path).load().unwrap_err();
        assert!(matches!(err, FeedbackError::SnapshotFormat { .. }));
    }
}
