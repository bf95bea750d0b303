use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use mitschrift::application::ports::{JobStore, NotesStore, ToolRunner};
use mitschrift::application::services::LecturePipeline;
use mitschrift::domain::{Job, JobId};
use mitschrift::infrastructure::audio::{FfmpegConverter, WhisperCliTranscriber};
use mitschrift::infrastructure::jobs::InMemoryJobStore;
use mitschrift::infrastructure::llm::OllamaClient;
use mitschrift::infrastructure::observability::{TracingConfig, init_tracing};
use mitschrift::infrastructure::process::TokioToolRunner;
use mitschrift::infrastructure::storage::{LocalNotesStore, sanitize_filename};
use mitschrift::presentation::Settings;

const USAGE: &str = "Lecture audio to notes converter

Usage:
  lecture-converter <path to audio file>

Examples:
  lecture-converter ./lecture.mp3
  lecture-converter /path/to/lecture.m4a

Supported formats: mp3, m4a, wav, ogg, flac and anything else ffmpeg decodes.";

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(audio_path) = args.first() else {
        println!("{}", USAGE);
        return;
    };

    init_tracing(TracingConfig::default());
    let settings = Settings::from_env();

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
        match LocalNotesStore::new(settings.pipeline.output_dir.clone()) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
    let job_store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());

    let pipeline = LecturePipeline::new(
        converter,
        transcriber,
        summarizer,
        notes_store,
        Arc::clone(&job_store),
        settings.pipeline.temp_dir.clone(),
    );

    let source = Path::new(audio_path);
    let original = sanitize_filename(&source.file_name().unwrap_or_default().to_string_lossy());
    let job_id = JobId::for_upload(&original);
    if let Err(e) = job_store
        .insert(Job::new(job_id.clone(), original.clone()))
        .await
    {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    match pipeline.process(&job_id, source, &original).await {
        Ok(output) => {
            println!("Done! Notes written to {}", output.display());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
