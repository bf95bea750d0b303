use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use crate::application::ports::NotesStoreError;
use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

/// Serves a notes artifact by name. Traversal attempts and unknown names
/// both answer 404 so the endpoint leaks nothing about the filesystem.
#[tracing::instrument(skip(state))]
pub async fn download_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> impl IntoResponse {
    match state.notes_store.open(&filename).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    "text/plain; charset=utf-8".to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(NotesStoreError::InvalidFilename(name)) => {
            tracing::warn!(filename = %name, "Rejected artifact name");
            not_found()
        }
        Err(NotesStoreError::NotFound(_)) => not_found(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read artifact");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to read artifact".to_string(),
                }),
            )
                .into_response()
        }
    }
}

fn not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "File not found".to_string(),
        }),
    )
        .into_response()
}
