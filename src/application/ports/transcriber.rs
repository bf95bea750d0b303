use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::ToolError;

/// Turns a normalized waveform file into plain transcript text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, wav: &Path, work_dir: &Path) -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error("transcription reported success but no transcript at {0}")]
    MissingTranscript(PathBuf),
    #[error("failed to read transcript: {0}")]
    Io(#[from] std::io::Error),
}
