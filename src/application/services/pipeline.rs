use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ports::{
    AudioConverter, ConversionError, JobStore, JobStoreError, NotesStore, NotesStoreError,
    SummaryError, Summarizer, TranscriptionError, Transcriber,
};
use crate::domain::{JobId, JobStatus};

/// Sequences the four pipeline stages for one uploaded file: convert to a
/// normalized waveform, transcribe, summarize, persist the notes. Each job
/// gets its own working directory under the configured temp dir, removed
/// unconditionally once the job settles.
pub struct LecturePipeline<C, T, S> {
    converter: Arc<C>,
    transcriber: Arc<T>,
    summarizer: Arc<S>,
    notes_store: Arc<dyn NotesStore>,
    job_store: Arc<dyn JobStore>,
    temp_dir: PathBuf,
}

impl<C, T, S> LecturePipeline<C, T, S>
where
    C: AudioConverter + 'static,
    T: Transcriber + 'static,
    S: Summarizer + 'static,
{
    pub fn new(
        converter: Arc<C>,
        transcriber: Arc<T>,
        summarizer: Arc<S>,
        notes_store: Arc<dyn NotesStore>,
        job_store: Arc<dyn JobStore>,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            converter,
            transcriber,
            summarizer,
            notes_store,
            job_store,
            temp_dir,
        }
    }

    /// Runs the whole pipeline for one job. Returns the absolute path of
    /// the persisted notes file.
    pub async fn process(
        &self,
        job_id: &JobId,
        source: &Path,
        original_name: &str,
    ) -> Result<PathBuf, PipelineError> {
        match tokio::fs::try_exists(source).await {
            Ok(true) => {}
            _ => return Err(PipelineError::SourceMissing(source.to_path_buf())),
        }

        let work_dir = self.temp_dir.join(job_id.as_str());
        tokio::fs::create_dir_all(&work_dir)
            .await
            .map_err(PipelineError::Workspace)?;

        let result = self
            .run_stages(job_id, source, original_name, &work_dir)
            .await;

        if let Err(e) = tokio::fs::remove_dir_all(&work_dir).await {
            tracing::warn!(
                error = %e,
                work_dir = %work_dir.display(),
                "Failed to remove working directory"
            );
        }

        result
    }

    async fn run_stages(
        &self,
        job_id: &JobId,
        source: &Path,
        original_name: &str,
        work_dir: &Path,
    ) -> Result<PathBuf, PipelineError> {
        self.update_status(job_id, JobStatus::Converting).await?;
        let wav = self
            .converter
            .to_wav(source, work_dir)
            .await
            .map_err(PipelineError::Conversion)?;
        tracing::debug!(wav = %wav.display(), "Audio normalized");

        self.update_status(job_id, JobStatus::Transcribing).await?;
        let transcript = self
            .transcriber
            .transcribe(&wav, work_dir)
            .await
            .map_err(PipelineError::Transcription)?;
        tracing::debug!(chars = transcript.len(), "Transcript ready");

        self.update_status(job_id, JobStatus::Summarizing).await?;
        let notes = self
            .summarizer
            .summarize(&transcript)
            .await
            .map_err(PipelineError::Summary)?;

        self.update_status(job_id, JobStatus::Persisting).await?;
        let output = self
            .notes_store
            .save(&notes, original_name)
            .await
            .map_err(PipelineError::Persist)?;

        if let Some(filename) = output.file_name().and_then(|n| n.to_str()) {
            self.job_store
                .set_artifact(job_id, filename)
                .await
                .map_err(PipelineError::JobStore)?;
        }

        Ok(output)
    }

    async fn update_status(&self, job_id: &JobId, status: JobStatus) -> Result<(), PipelineError> {
        tracing::debug!(status = %status, "Job status transition");
        self.job_store
            .update_status(job_id, status, None)
            .await
            .map_err(PipelineError::JobStore)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("source file missing: {0}")]
    SourceMissing(PathBuf),
    #[error("failed to create working directory: {0}")]
    Workspace(std::io::Error),
    #[error("conversion: {0}")]
    Conversion(ConversionError),
    #[error("transcription: {0}")]
    Transcription(TranscriptionError),
    #[error("summary: {0}")]
    Summary(SummaryError),
    #[error("persist: {0}")]
    Persist(NotesStoreError),
    #[error("job store: {0}")]
    JobStore(JobStoreError),
}
