use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    convert_handler, download_handler, health_handler, job_status_handler, results_handler,
};
use crate::presentation::state::AppState;

/// Slack on top of the configured upload cap so multipart framing does not
/// trip the framework limit before our own size check answers with JSON.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let body_limit =
        DefaultBodyLimit::max(state.settings.upload.max_bytes as usize + MULTIPART_OVERHEAD);

    let static_files = ServeDir::new(&state.settings.server.public_dir);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/convert", post(convert_handler))
        .route("/api/results", get(results_handler))
        .route("/api/download/{filename}", get(download_handler))
        .route("/api/jobs/{job_id}", get(job_status_handler))
        .fallback_service(static_files)
        .layer(body_limit)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
