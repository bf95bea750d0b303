use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use mitschrift::application::ports::{JobStore, NotesStore, StagingStore, ToolRunner};
use mitschrift::application::services::{LecturePipeline, PipelineWorker};
use mitschrift::infrastructure::audio::{FfmpegConverter, WhisperCliTranscriber};
use mitschrift::infrastructure::jobs::InMemoryJobStore;
use mitschrift::infrastructure::llm::OllamaClient;
use mitschrift::infrastructure::observability::{TracingConfig, init_tracing};
use mitschrift::infrastructure::process::TokioToolRunner;
use mitschrift::infrastructure::storage::{LocalNotesStore, LocalStagingStore};
use mitschrift::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();
    init_tracing(TracingConfig::default());

    let runner: Arc<dyn ToolRunner> = Arc::new(TokioToolRunner::new(Duration::from_secs(
        settings.pipeline.tool_timeout_secs,
    )));
    let converter = Arc::new(FfmpegConverter::new(Arc::clone(&runner)));
    let transcriber = Arc::new(WhisperCliTranscriber::new(
        Arc::clone(&runner),
        settings.pipeline.whisper_model.clone(),
        settings.pipeline.language.clone(),
    ));
    let summarizer = Arc::new(OllamaClient::new(
        &settings.pipeline.ollama_url,
        &settings.pipeline.ollama_model,
        Duration::from_secs(settings.pipeline.summary_timeout_secs),
    ));

    let notes_store: Arc<dyn NotesStore> =
        Arc::new(LocalNotesStore::new(settings.pipeline.output_dir.clone())?);
    let staging: Arc<dyn StagingStore> =
        Arc::new(LocalStagingStore::new(settings.upload.dir.clone())?);
    let job_store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());

    let pipeline = Arc::new(LecturePipeline::new(
        converter,
        transcriber,
        summarizer,
        Arc::clone(&notes_store),
        Arc::clone(&job_store),
        settings.pipeline.temp_dir.clone(),
    ));

    let (pipeline_sender, receiver) = mpsc::channel(settings.pipeline.queue_depth);
    let worker = PipelineWorker::new(
        receiver,
        pipeline,
        Arc::clone(&job_store),
        Arc::clone(&staging),
        settings.pipeline.max_concurrent_jobs,
    );
    tokio::spawn(worker.run());

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;

    let state = AppState {
        job_store,
        staging,
        notes_store,
        pipeline_sender,
        settings,
    };
    let router = create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
