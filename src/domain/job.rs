use std::fmt;

use chrono::{DateTime, Utc};

use super::JobStatus;

/// Identifies one pipeline run. The value doubles as the staged upload's
/// filename: `<unix-millis>-<original filename>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn for_upload(original_filename: &str) -> Self {
        Self(format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            original_filename
        ))
    }

    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub original_filename: String,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub artifact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: JobId, original_filename: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            original_filename,
            status: JobStatus::Queued,
            error_message: None,
            artifact: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_original_filename_when_creating_job_id_then_millis_prefix_and_name_suffix() {
        let id = JobId::for_upload("lecture.mp3");
        let (millis, name) = id.as_str().split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(name, "lecture.mp3");
    }

    #[test]
    fn given_new_job_then_status_is_queued_with_no_error() {
        let job = Job::new(JobId::from_raw("1700000000000-a.wav"), "a.wav".to_string());
        assert_eq!(job.status, JobStatus::Queued);
        assert!(job.error_message.is_none());
        assert!(job.artifact.is_none());
    }
}
