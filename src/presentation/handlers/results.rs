use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub filename: String,
    pub size: u64,
    pub created: String,
    pub download_url: String,
}

/// Lists every notes artifact in the output directory, newest first.
#[tracing::instrument(skip(state))]
pub async fn results_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.notes_store.list().await {
        Ok(artifacts) => {
            let entries: Vec<ResultEntry> = artifacts
                .into_iter()
                .map(|a| ResultEntry {
                    download_url: format!("/api/download/{}", a.filename),
                    filename: a.filename,
                    size: a.size,
                    created: a.created.to_rfc3339(),
                })
                .collect();
            (StatusCode::OK, Json(entries)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list results");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list results".to_string(),
                }),
            )
                .into_response()
        }
    }
}
