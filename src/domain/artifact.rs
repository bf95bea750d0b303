use chrono::{DateTime, Utc};

/// A persisted notes file in the output directory, the only durable entity
/// in the system.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub filename: String,
    pub size: u64,
    pub created: DateTime<Utc>,
}
