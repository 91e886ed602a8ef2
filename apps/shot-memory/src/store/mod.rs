//! Shot record store: one JSON array document holding every record in
//! append order.
//!
//! Every mutation is a full load → mutate → save cycle. Those cycles run
//! under `write_lock`, so two writers can never both read the same snapshot
//! and lose one another's update. Readers skip the lock; backends replace
//! the document atomically, so a read sees either the old or new state.
//!
//! Array entries that do not decode as a `ShotRecord` are hidden from readers
//! but written back verbatim, so the store never deletes a record.

pub mod backend;
pub mod validation;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::errors::StoreError;
use crate::models::{Feedback, ShotRecord};

pub use backend::{DocumentBackend, FileBackend, MemoryBackend};
pub use validation::{is_valid, validate_record, RecordIssue};

/// One element of the persisted array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
enum StoredEntry {
    Shot(ShotRecord),
    /// Kept exactly as found on disk.
    Raw(Value),
}

impl StoredEntry {
    fn id(&self) -> Option<&str> {
        match self {
            StoredEntry::Shot(record) => Some(&record.id),
            StoredEntry::Raw(value) => value.get("id").and_then(Value::as_str),
        }
    }
}

fn into_shots(entries: Vec<StoredEntry>) -> Vec<ShotRecord> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            StoredEntry::Shot(record) => Some(record),
            StoredEntry::Raw(_) => None,
        })
        .collect()
}

pub struct ShotStore {
    backend: Arc<dyn DocumentBackend>,
    write_lock: Mutex<()>,
}

impl ShotStore {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Store backed by a JSON file at `path`. The file is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileBackend::new(path)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Every record for every course, in append order.
    pub async fn get_all(&self) -> Result<Vec<ShotRecord>, StoreError> {
        Ok(into_shots(self.load().await?))
    }

    /// Records for one course, in append order.
    pub async fn shots_for_course(&self, course_id: &str) -> Result<Vec<ShotRecord>, StoreError> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|r| r.course_id == course_id)
            .collect())
    }

    /// Number of readable records.
    pub async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.get_all().await?.len())
    }

    /// Appends a fully-formed record and returns its id.
    ///
    /// Records missing id/course/hole, or reusing an existing id, are
    /// rejected before anything is written.
    pub async fn append(&self, record: ShotRecord) -> Result<String, StoreError> {
        let issues = validate_record(&record);
        if !issues.is_empty() {
            let reasons: Vec<_> = issues.iter().map(RecordIssue::describe).collect();
            return Err(StoreError::InvalidRecord(reasons.join("; ")));
        }

        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        if entries.iter().any(|e| e.id() == Some(record.id.as_str())) {
            return Err(StoreError::DuplicateId(record.id));
        }

        let id = record.id.clone();
        let course_id = record.course_id.clone();
        let hole = record.hole_number;
        entries.push(StoredEntry::Shot(record));
        self.persist(&entries).await?;

        info!(
            shot_id = %id,
            course_id = %course_id,
            hole,
            total = entries.len(),
            "Appended shot record"
        );
        Ok(id)
    }

    /// Sets the feedback fields on the record with `id`.
    /// Returns `Ok(false)` without writing when no such record exists.
    pub async fn update_feedback(
        &self,
        id: &str,
        feedback: Feedback,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;

        let target = entries.iter_mut().find_map(|entry| match entry {
            StoredEntry::Shot(record) if record.id == id => Some(record),
            _ => None,
        });
        let Some(record) = target else {
            debug!(shot_id = %id, "Feedback target not found");
            return Ok(false);
        };
        record.apply_feedback(feedback, at);

        self.persist(&entries).await?;
        info!(shot_id = %id, feedback = feedback.as_str(), "Updated shot feedback");
        Ok(true)
    }

    async fn load(&self) -> Result<Vec<StoredEntry>, StoreError> {
        match self.backend.load().await? {
            Some(bytes) => Ok(decode_document(&bytes, &self.backend.describe())),
            None => Ok(Vec::new()),
        }
    }

    async fn persist(&self, entries: &[StoredEntry]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        self.backend.save(&bytes).await
    }
}

/// Decodes the persisted array. A document that is not a JSON array reads as
/// empty; individual entries that fail to decode are kept as `Raw`. Both are
/// logged.
fn decode_document(bytes: &[u8], location: &str) -> Vec<StoredEntry> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Vec::new();
    }

    let entries = match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Array(entries)) => entries,
        Ok(other) => {
            warn!(
                location,
                kind = json_kind(&other),
                "Shot document is not an array; treating as empty"
            );
            return Vec::new();
        }
        Err(e) => {
            warn!(location, error = %e, "Shot document is malformed; treating as empty");
            return Vec::new();
        }
    };

    let decoded: Vec<StoredEntry> = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            if !entry.is_object() {
                warn!(location, index, "Keeping non-object shot entry unread");
                return StoredEntry::Raw(entry);
            }
            match ShotRecord::deserialize(&entry) {
                Ok(record) => StoredEntry::Shot(record),
                Err(e) => {
                    warn!(location, index, error = %e, "Keeping undecodable shot entry unread");
                    StoredEntry::Raw(entry)
                }
            }
        })
        .collect();

    let unread = decoded
        .iter()
        .filter(|e| matches!(e, StoredEntry::Raw(_)))
        .count();
    if unread > 0 {
        warn!(
            location,
            readable = decoded.len() - unread,
            unread,
            "Shot document has entries that cannot be read"
        );
    }
    decoded
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
