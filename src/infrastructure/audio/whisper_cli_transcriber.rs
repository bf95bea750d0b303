use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{ToolRunner, Transcriber, TranscriptionError};

/// Drives the whisper command-line interface against a normalized waveform
/// file. The tool writes a plain-text sidecar named after the input's stem
/// into the working directory; the transcript is read back from there.
pub struct WhisperCliTranscriber {
    runner: Arc<dyn ToolRunner>,
    model: String,
    language: String,
}

impl WhisperCliTranscriber {
    pub fn new(runner: Arc<dyn ToolRunner>, model: String, language: String) -> Self {
        Self {
            runner,
            model,
            language,
        }
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, wav: &Path, work_dir: &Path) -> Result<String, TranscriptionError> {
        let wav_arg = wav.to_string_lossy();
        let dir_arg = work_dir.to_string_lossy();

        tracing::info!(model = %self.model, language = %self.language, "Transcribing audio");

        self.runner
            .run(
                "whisper",
                &[
                    wav_arg.as_ref(),
                    "--model",
                    &self.model,
                    "--language",
                    &self.language,
                    "--output_dir",
                    dir_arg.as_ref(),
                    "--output_format",
                    "txt",
                ],
            )
            .await?;

        // A zero exit does not prove the sidecar exists; check before
        // reading so a silently-failed run surfaces as a clear error.
        let stem = wav.file_stem().unwrap_or_default();
        let sidecar = work_dir.join(stem).with_extension("txt");
        match tokio::fs::try_exists(&sidecar).await {
            Ok(true) => {}
            _ => return Err(TranscriptionError::MissingTranscript(sidecar)),
        }

        let transcript = tokio::fs::read_to_string(&sidecar).await?;

        tracing::info!(chars = transcript.len(), "Transcription finished");
        Ok(transcript)
    }
}
