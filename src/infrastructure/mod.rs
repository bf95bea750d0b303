pub mod audio;
pub mod jobs;
pub mod llm;
pub mod observability;
pub mod process;
pub mod storage;
