use std::fmt;
use std::str::FromStr;

/// Pipeline stage a job is currently in. Strictly sequential:
/// `Queued -> Converting -> Transcribing -> Summarizing -> Persisting ->
/// Completed`, with `Failed` reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Queued,
    Converting,
    Transcribing,
    Summarizing,
    Persisting,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::Converting => "CONVERTING",
            JobStatus::Transcribing => "TRANSCRIBING",
            JobStatus::Summarizing => "SUMMARIZING",
            JobStatus::Persisting => "PERSISTING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QUEUED" => Ok(JobStatus::Queued),
            "CONVERTING" => Ok(JobStatus::Converting),
            "TRANSCRIBING" => Ok(JobStatus::Transcribing),
            "SUMMARIZING" => Ok(JobStatus::Summarizing),
            "PERSISTING" => Ok(JobStatus::Persisting),
            "COMPLETED" => Ok(JobStatus::Completed),
            "FAILED" => Ok(JobStatus::Failed),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
