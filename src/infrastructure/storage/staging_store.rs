use std::io;
use std::path::PathBuf;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::io::AsyncWriteExt;

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::JobId;

/// Staging directory for uploaded source files. Each upload lives at
/// `<base>/<job id>` until its pipeline settles.
pub struct LocalStagingStore {
    base: PathBuf,
}

impl LocalStagingStore {
    pub fn new(base: PathBuf) -> Result<Self, StagingStoreError> {
        std::fs::create_dir_all(&base)?;
        Ok(Self { base })
    }
}

#[async_trait::async_trait]
impl StagingStore for LocalStagingStore {
    async fn store(
        &self,
        id: &JobId,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
        max_bytes: u64,
    ) -> Result<u64, StagingStoreError> {
        let path = self.path_for(id);
        let mut file = tokio::fs::File::create(&path).await?;
        let mut total: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    drop(file);
                    let _ = tokio::fs::remove_file(&path).await;
                    return Err(StagingStoreError::Stream(e.to_string()));
                }
            };

            total += bytes.len() as u64;
            if total > max_bytes {
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
                return Err(StagingStoreError::TooLarge { max_bytes });
            }

            if let Err(e) = file.write_all(&bytes).await {
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
                return Err(StagingStoreError::Io(e));
            }
        }

        file.flush().await?;
        Ok(total)
    }

    async fn delete(&self, id: &JobId) -> Result<(), StagingStoreError> {
        tokio::fs::remove_file(self.path_for(id)).await?;
        Ok(())
    }

    fn path_for(&self, id: &JobId) -> PathBuf {
        self.base.join(id.as_str())
    }
}

/// Strips anything that could move an upload's name out of the staging
/// directory: path components, separators, leading dots.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
    let base = base.trim_start_matches('.');
    if base.is_empty() {
        "upload".to_string()
    } else {
        base.to_string()
    }
}
