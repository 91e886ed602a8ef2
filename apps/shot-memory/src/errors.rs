use thiserror::Error;

/// Failure of the shot record store.
///
/// Absent or malformed documents are not errors; they read as an empty
/// collection. Only real I/O and encoding failures, plus records rejected
/// at the store boundary, surface here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid shot record: {0}")]
    InvalidRecord(String),

    #[error("Duplicate shot id: {0}")]
    DuplicateId(String),

    #[error("Storage task failed: {0}")]
    Task(String),
}

impl StoreError {
    /// True when the backing document could not be read or written.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            StoreError::Io(_) | StoreError::Serialization(_) | StoreError::Task(_)
        )
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(e: tokio::task::JoinError) -> Self {
        StoreError::Task(e.to_string())
    }
}
