//! Persisted-document primitives behind the shot store.
//!
//! A backend only knows how to read and replace one opaque blob. Locking and
//! decoding live in `ShotStore`.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::StoreError;

#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Returns the whole document, or `None` when it has never been written.
    async fn load(&self) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replaces the whole document. Readers must never observe a partial write.
    async fn save(&self, bytes: &[u8]) -> Result<(), StoreError>;

    /// Human-readable location for log lines.
    fn describe(&self) -> String;
}

// ────────────────────────────────────────────────────────────────────────────
// FileBackend
// ────────────────────────────────────────────────────────────────────────────

/// JSON file on local disk, replaced via temp file + rename.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentBackend for FileBackend {
    async fn load(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Shot document not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path.clone();
        let bytes = bytes.to_vec();
        tokio::task::spawn_blocking(move || write_atomically(&path, &bytes)).await?
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes into a sibling temp file, fsyncs, then renames over the target.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryBackend
// ────────────────────────────────────────────────────────────────────────────

/// In-process blob. Saves swap the whole buffer under a write lock.
#[derive(Default)]
pub struct MemoryBackend {
    blob: RwLock<Option<Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the backend with an existing document.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: RwLock::new(Some(bytes.into())),
        }
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn load(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.blob.read().await.clone())
    }

    async fn save(&self, bytes: &[u8]) -> Result<(), StoreError> {
        *self.blob.write().await = Some(bytes.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
