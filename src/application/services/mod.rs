mod pipeline;
mod pipeline_worker;

pub use pipeline::{LecturePipeline, PipelineError};
pub use pipeline_worker::{PipelineMessage, PipelineWorker};
