use async_trait::async_trait;

/// Generates structured notes text from a transcript.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &str) -> Result<String, SummaryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("summary service returned {status}: {body}")]
    ServiceStatus { status: u16, body: String },
    #[error("summary request failed: {0}")]
    Request(String),
    #[error("invalid summary response: {0}")]
    InvalidResponse(String),
}
