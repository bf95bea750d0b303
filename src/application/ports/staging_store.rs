use std::io;
use std::path::PathBuf;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::JobId;

/// Holds uploaded source files between upload acceptance and pipeline
/// completion. Files are keyed by job id and deleted once the job settles.
#[async_trait::async_trait]
pub trait StagingStore: Send + Sync {
    /// Streams an upload to disk, enforcing `max_bytes` while the body is
    /// still arriving. Returns the number of bytes written.
    async fn store(
        &self,
        id: &JobId,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
        max_bytes: u64,
    ) -> Result<u64, StagingStoreError>;

    async fn delete(&self, id: &JobId) -> Result<(), StagingStoreError>;

    /// Filesystem location a stored upload lives at.
    fn path_for(&self, id: &JobId) -> PathBuf;
}

#[derive(Debug, thiserror::Error)]
pub enum StagingStoreError {
    #[error("upload exceeds {max_bytes} bytes")]
    TooLarge { max_bytes: u64 },
    #[error("upload stream failed: {0}")]
    Stream(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
