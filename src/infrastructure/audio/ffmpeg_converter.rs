use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{AudioConverter, ConversionError, ToolRunner};

/// Waveform file every job's conversion stage writes into its working
/// directory. The speech engine expects mono 16 kHz signed 16-bit PCM.
const WAV_FILENAME: &str = "audio.wav";

pub struct FfmpegConverter {
    runner: Arc<dyn ToolRunner>,
}

impl FfmpegConverter {
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl AudioConverter for FfmpegConverter {
    async fn to_wav(&self, input: &Path, work_dir: &Path) -> Result<PathBuf, ConversionError> {
        let output = work_dir.join(WAV_FILENAME);
        let input_arg = input.to_string_lossy();
        let output_arg = output.to_string_lossy();

        tracing::info!(input = %input.display(), "Converting audio to 16 kHz mono WAV");

        self.runner
            .run(
                "ffmpeg",
                &[
                    "-i",
                    input_arg.as_ref(),
                    "-ar",
                    "16000",
                    "-ac",
                    "1",
                    "-c:a",
                    "pcm_s16le",
                    "-y",
                    output_arg.as_ref(),
                ],
            )
            .await?;

        tracing::info!("Conversion finished");
        Ok(output)
    }
}
