mod settings;

pub use settings::{PipelineSettings, ServerSettings, Settings, UploadSettings};
