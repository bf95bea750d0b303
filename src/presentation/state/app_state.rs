use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{JobStore, NotesStore, StagingStore};
use crate::application::services::PipelineMessage;
use crate::presentation::config::Settings;

/// Everything the HTTP handlers need. The pipeline itself lives behind the
/// submission channel; handlers only enqueue work and read state.
#[derive(Clone)]
pub struct AppState {
    pub job_store: Arc<dyn JobStore>,
    pub staging: Arc<dyn StagingStore>,
    pub notes_store: Arc<dyn NotesStore>,
    pub pipeline_sender: mpsc::Sender<PipelineMessage>,
    pub settings: Settings,
}
