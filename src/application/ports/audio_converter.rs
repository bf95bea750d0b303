use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::ToolError;

/// Normalizes an arbitrary-format audio file into the fixed waveform
/// representation the speech engine expects (mono, 16 kHz, 16-bit PCM).
#[async_trait]
pub trait AudioConverter: Send + Sync {
    async fn to_wav(&self, input: &Path, work_dir: &Path) -> Result<PathBuf, ConversionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error(transparent)]
    Tool(#[from] ToolError),
}
