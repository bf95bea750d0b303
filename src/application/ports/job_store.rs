use async_trait::async_trait;

use crate::domain::{Job, JobId, JobStatus};

/// In-memory record of every submitted job, queryable by id. Jobs are not
/// persisted across restarts.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, job: Job) -> Result<(), JobStoreError>;

    async fn get(&self, id: &JobId) -> Result<Option<Job>, JobStoreError>;

    async fn update_status(
        &self,
        id: &JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), JobStoreError>;

    async fn set_artifact(&self, id: &JobId, filename: &str) -> Result<(), JobStoreError>;

    async fn list(&self) -> Result<Vec<Job>, JobStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum JobStoreError {
    #[error("job not found: {0}")]
    NotFound(JobId),
}
