use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::Instrument;

use crate::application::ports::{AudioConverter, JobStore, StagingStore, Summarizer, Transcriber};
use crate::application::services::LecturePipeline;
use crate::domain::{JobId, JobStatus};

pub struct PipelineMessage {
    pub job_id: JobId,
    pub original_filename: String,
    pub source_path: PathBuf,
}

/// Drains the submission queue and runs pipelines in the background. At
/// most `max_concurrent` jobs run at once; the bounded channel feeding the
/// worker is the admission control for everything beyond that.
pub struct PipelineWorker<C, T, S> {
    receiver: mpsc::Receiver<PipelineMessage>,
    pipeline: Arc<LecturePipeline<C, T, S>>,
    job_store: Arc<dyn JobStore>,
    staging: Arc<dyn StagingStore>,
    semaphore: Arc<Semaphore>,
}

impl<C, T, S> PipelineWorker<C, T, S>
where
    C: AudioConverter + 'static,
    T: Transcriber + 'static,
    S: Summarizer + 'static,
{
    pub fn new(
        receiver: mpsc::Receiver<PipelineMessage>,
        pipeline: Arc<LecturePipeline<C, T, S>>,
        job_store: Arc<dyn JobStore>,
        staging: Arc<dyn StagingStore>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            receiver,
            pipeline,
            job_store,
            staging,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Pipeline worker started");
        while let Some(msg) = self.receiver.recv().await {
            let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
                Ok(p) => p,
                Err(_) => break,
            };

            let span = tracing::info_span!(
                "pipeline_job",
                job_id = %msg.job_id,
                filename = %msg.original_filename,
            );

            let pipeline = Arc::clone(&self.pipeline);
            let job_store = Arc::clone(&self.job_store);
            let staging = Arc::clone(&self.staging);

            tokio::spawn(
                async move {
                    let _permit = permit;
                    process_job(pipeline, job_store, staging, msg).await;
                }
                .instrument(span),
            );
        }
        tracing::info!("Pipeline worker stopped: channel closed");
    }
}

/// Runs one job to a terminal state. Never propagates an error: a failed
/// job is recorded and logged, and must not take the server down.
async fn process_job<C, T, S>(
    pipeline: Arc<LecturePipeline<C, T, S>>,
    job_store: Arc<dyn JobStore>,
    staging: Arc<dyn StagingStore>,
    msg: PipelineMessage,
) where
    C: AudioConverter + 'static,
    T: Transcriber + 'static,
    S: Summarizer + 'static,
{
    let result = pipeline
        .process(&msg.job_id, &msg.source_path, &msg.original_filename)
        .await;

    let terminal = match &result {
        Ok(output) => {
            tracing::info!(output = %output.display(), "Job completed");
            job_store
                .update_status(&msg.job_id, JobStatus::Completed, None)
                .await
        }
        Err(e) => {
            tracing::error!(error = %e, "Job failed");
            job_store
                .update_status(&msg.job_id, JobStatus::Failed, Some(&e.to_string()))
                .await
        }
    };

    if let Err(e) = terminal {
        tracing::error!(error = %e, "Failed to record terminal job status");
    }

    // The staged upload is deleted however the job settled.
    if let Err(e) = staging.delete(&msg.job_id).await {
        tracing::warn!(error = %e, "Failed to delete staged upload");
    }
}
