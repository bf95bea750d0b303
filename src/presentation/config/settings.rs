use std::path::PathBuf;

use serde::Deserialize;

/// Immutable runtime configuration, passed into each component at
/// construction. Defaults mirror a local single-machine deployment; the
/// env overrides in [`Settings::from_env`] are the only external knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub upload: UploadSettings,
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub public_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    pub dir: PathBuf,
    pub max_bytes: u64,
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub whisper_model: String,
    pub language: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub temp_dir: PathBuf,
    pub output_dir: PathBuf,
    pub max_concurrent_jobs: usize,
    pub queue_depth: usize,
    pub tool_timeout_secs: u64,
    pub summary_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 3000,
                public_dir: PathBuf::from("./public"),
            },
            upload: UploadSettings {
                dir: PathBuf::from("./uploads"),
                max_bytes: 500 * 1024 * 1024,
                allowed_extensions: ["mp3", "wav", "m4a", "ogg", "flac", "webm"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
            pipeline: PipelineSettings {
                whisper_model: "base".to_string(),
                language: "de".to_string(),
                ollama_url: "http://localhost:11434".to_string(),
                ollama_model: "llama3.2".to_string(),
                temp_dir: PathBuf::from("./temp"),
                output_dir: PathBuf::from("./output"),
                max_concurrent_jobs: 2,
                queue_depth: 16,
                tool_timeout_secs: 1800,
                summary_timeout_secs: 600,
            },
        }
    }
}

impl Settings {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Some(port) = env_parse("SERVER_PORT") {
            settings.server.port = port;
        }
        if let Ok(dir) = std::env::var("UPLOAD_DIR") {
            settings.upload.dir = PathBuf::from(dir);
        }
        if let Some(mb) = env_parse::<u64>("MAX_UPLOAD_MB") {
            settings.upload.max_bytes = mb * 1024 * 1024;
        }
        if let Ok(model) = std::env::var("WHISPER_MODEL") {
            settings.pipeline.whisper_model = model;
        }
        if let Ok(language) = std::env::var("WHISPER_LANGUAGE") {
            settings.pipeline.language = language;
        }
        if let Ok(url) = std::env::var("OLLAMA_URL") {
            settings.pipeline.ollama_url = url;
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            settings.pipeline.ollama_model = model;
        }
        if let Ok(dir) = std::env::var("TEMP_DIR") {
            settings.pipeline.temp_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("OUTPUT_DIR") {
            settings.pipeline.output_dir = PathBuf::from(dir);
        }
        if let Some(n) = env_parse("MAX_CONCURRENT_JOBS") {
            settings.pipeline.max_concurrent_jobs = n;
        }

        settings
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
