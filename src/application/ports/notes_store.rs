use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::Artifact;

/// The output directory of finished notes. The directory listing is the
/// source of truth; there is no index file.
#[async_trait]
pub trait NotesStore: Send + Sync {
    /// Writes notes text under a name derived from the original upload's
    /// stem and the current time. Returns the absolute output path.
    async fn save(&self, notes: &str, original_name: &str) -> Result<PathBuf, NotesStoreError>;

    /// All artifacts, newest first.
    async fn list(&self) -> Result<Vec<Artifact>, NotesStoreError>;

    /// Reads a named artifact back. Rejects names that could escape the
    /// output directory before touching the filesystem.
    async fn open(&self, filename: &str) -> Result<Vec<u8>, NotesStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotesStoreError {
    #[error("invalid artifact name: {0}")]
    InvalidFilename(String),
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
