mod convert;
mod download;
mod health;
mod job_status;
mod results;

pub use convert::convert_handler;
pub use download::download_handler;
pub use health::health_handler;
pub use job_status::job_status_handler;
pub use results::results_handler;

use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
