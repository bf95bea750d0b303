mod notes_store;
mod staging_store;

pub use notes_store::LocalNotesStore;
pub use staging_store::{LocalStagingStore, sanitize_filename};
