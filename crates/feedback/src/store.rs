//! Feedback log trait and implementations

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::{FeedbackError, FeedbackRecord, Result, LOG_HEADER};

/// One raw log row, fields in file order.
pub type Row = Vec<String>;

/// Append-only sink of feedback records.
///
/// `read_all` returns every row including the header, in insertion order.
/// A store that has never been written to reads back as an empty sequence.
pub trait FeedbackStore: Send + Sync {
    fn append(&mut self, record: &FeedbackRecord) -> Result<()>;
    fn read_all(&self) -> Result<Vec<Row>>;
}

/// Feedback log backed by a UTF-8 CSV file.
///
/// Appends are not locked. Each record (plus the header on first write) is
/// encoded up front and handed to a single `write_all` on an append-mode
/// handle, so concurrent writers interleave at most at line granularity.
#[derive(Clone, Debug)]
pub struct CsvFeedbackStore {
    path: PathBuf,
}

impl CsvFeedbackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, source: io::Error) -> FeedbackError {
        FeedbackError::StorageUnavailable {
            path: self.path.clone(),
            source,
        }
    }
}

impl FeedbackStore for CsvFeedbackStore {
    fn append(&mut self, record: &FeedbackRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.unavailable(e))?;

        // An existing zero-length file counts as not yet created.
        let fresh = file.metadata().map_err(|e| self.unavailable(e))?.len() == 0;

        let mut buf = Vec::new();
        if fresh {
            encode_row(&mut buf, &LOG_HEADER).map_err(|e| self.unavailable(e))?;
        }
        encode_row(&mut buf, &record.fields()).map_err(|e| self.unavailable(e))?;

        file.write_all(&buf).map_err(|e| self.unavailable(e))?;
        debug!(path = %self.path.display(), fresh, "feedback appended");
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Row>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.unavailable(e)),
        };
        decode_rows(file).map_err(|e| self.unavailable(e))
    }
}

/// In-memory feedback log (for testing and demos)
#[derive(Clone, Default)]
pub struct InMemoryFeedbackStore {
    rows: Arc<RwLock<Vec<Row>>>,
}

impl InMemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with raw rows, bypassing the header discipline.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }
}

impl FeedbackStore for InMemoryFeedbackStore {
    fn append(&mut self, record: &FeedbackRecord) -> Result<()> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        if rows.is_empty() {
            rows.push(LOG_HEADER.iter().map(|f| f.to_string()).collect());
        }
        rows.push(record.fields().iter().map(|f| f.to_string()).collect());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Row>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.clone())
    }
}

fn poisoned() -> FeedbackError {
    FeedbackError::StorageUnavailable {
        path: PathBuf::from(":memory:"),
        source: io::Error::other("feedback store lock poisoned"),
    }
}

fn encode_row(buf: &mut Vec<u8>, fields: &[&str]) -> io::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(fields).map_err(csv_to_io)?;
    let encoded = writer.into_inner().map_err(|e| e.into_error())?;
    buf.extend_from_slice(&encoded);
    Ok(())
}

fn decode_rows<R: Read>(source: R) -> io::Result<Vec<Row>> {
    // Ragged rows are kept here and filtered by the aggregator.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);

    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record).map_err(csv_to_io)? {
        rows.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
        );
    }
    Ok(rows)
}

fn csv_to_io(err: csv::Error) -> io::Error {
    match err.into_kind() {
        csv::ErrorKind::Io(e) => e,
        other => io::Error::new(io::ErrorKind::InvalidData, format!("{other:?}")),
    }
}
