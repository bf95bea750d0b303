use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::application::ports::{NotesStore, NotesStoreError};
use crate::domain::Artifact;

/// Output directory of finished notes files, named
/// `<original stem>_notes_<timestamp>.txt`. Writes are atomic single-file
/// creations, so the listing can scan the directory unsynchronized.
pub struct LocalNotesStore {
    output_dir: PathBuf,
}

impl LocalNotesStore {
    pub fn new(output_dir: PathBuf) -> Result<Self, NotesStoreError> {
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    fn validate_name(filename: &str) -> Result<(), NotesStoreError> {
        let rejected = filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
            || !filename.ends_with(".txt");
        if rejected {
            return Err(NotesStoreError::InvalidFilename(filename.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl NotesStore for LocalNotesStore {
    async fn save(&self, notes: &str, original_name: &str) -> Result<PathBuf, NotesStoreError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let stem = Path::new(original_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("notes");
        // Colons and periods are swapped out so the timestamp survives on
        // every filesystem.
        let timestamp = Utc::now()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        let filename = format!("{}_notes_{}.txt", stem, timestamp);

        let path = self.output_dir.join(&filename);
        tokio::fs::write(&path, notes).await?;

        let absolute = tokio::fs::canonicalize(&path).await?;
        tracing::info!(path = %absolute.display(), "Notes saved");
        Ok(absolute)
    }

    async fn list(&self) -> Result<Vec<Artifact>, NotesStoreError> {
        let mut entries = tokio::fs::read_dir(&self.output_dir).await?;
        let mut artifacts = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let metadata = entry.metadata().await?;
            let created = metadata
                .created()
                .or_else(|_| metadata.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            artifacts.push(Artifact {
                filename: filename.to_string(),
                size: metadata.len(),
                created,
            });
        }

        artifacts.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(artifacts)
    }

    async fn open(&self, filename: &str) -> Result<Vec<u8>, NotesStoreError> {
        Self::validate_name(filename)?;

        let path = self.output_dir.join(filename);
        match tokio::fs::try_exists(&path).await {
            Ok(true) => {}
            _ => return Err(NotesStoreError::NotFound(filename.to_string())),
        }

        Ok(tokio::fs::read(&path).await?)
    }
}
