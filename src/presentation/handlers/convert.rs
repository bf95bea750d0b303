use std::io;
use std::path::Path;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use futures::stream;
use serde::Serialize;

use crate::application::ports::StagingStoreError;
use crate::application::services::PipelineMessage;
use crate::domain::{Job, JobId, JobStatus};
use crate::infrastructure::storage::sanitize_filename;
use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub message: String,
    pub job_id: String,
    pub status: String,
}

/// Accepts one uploaded audio file and enqueues a pipeline run. The
/// response is sent before the pipeline does any work; progress is
/// observable via `/api/jobs/{id}` and, once finished, `/api/results`.
#[tracing::instrument(skip(state, multipart))]
pub async fn convert_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(f)) if f.name() == Some("audio") => break f,
            Ok(Some(_)) => continue,
            Ok(None) => {
                tracing::warn!("Convert request without an audio field");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "No audio file uploaded".to_string(),
                    }),
                )
                    .into_response();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart body");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Failed to read upload: {}", e),
                    }),
                )
                    .into_response();
            }
        }
    };

    let raw_name = field.file_name().unwrap_or("upload").to_string();
    let original = sanitize_filename(&raw_name);
    let mime = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    if !upload_allowed(&original, &mime, &state.settings.upload.allowed_extensions) {
        tracing::warn!(filename = %original, mime = %mime, "Rejected upload type");
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(ErrorResponse {
                error: format!("Unsupported file format: {}", original),
            }),
        )
            .into_response();
    }

    let job_id = JobId::for_upload(&original);
    let max_bytes = state.settings.upload.max_bytes;

    let body = Box::pin(stream::try_unfold(field, |mut field| async move {
        match field.chunk().await {
            Ok(Some(bytes)) => Ok(Some((bytes, field))),
            Ok(None) => Ok(None),
            Err(e) => Err(io::Error::other(e)),
        }
    }));
    match state.staging.store(&job_id, body, max_bytes).await {
        Ok(bytes) => {
            tracing::debug!(bytes, filename = %original, "Upload staged");
        }
        Err(StagingStoreError::TooLarge { max_bytes }) => {
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ErrorResponse {
                    error: format!("File exceeds the maximum of {} bytes", max_bytes),
                }),
            )
                .into_response();
        }
        Err(StagingStoreError::Stream(e)) => {
            tracing::warn!(error = %e, "Upload stream aborted");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read upload: {}", e),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to stage upload");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to store upload".to_string(),
                }),
            )
                .into_response();
        }
    }

    let job = Job::new(job_id.clone(), original.clone());
    if let Err(e) = state.job_store.insert(job).await {
        tracing::error!(error = %e, "Failed to create job record");
        let _ = state.staging.delete(&job_id).await;
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to create job".to_string(),
            }),
        )
            .into_response();
    }

    let msg = PipelineMessage {
        job_id: job_id.clone(),
        original_filename: original.clone(),
        source_path: state.staging.path_for(&job_id),
    };

    if state.pipeline_sender.try_send(msg).is_err() {
        tracing::warn!(job_id = %job_id, "Submission queue full, rejecting upload");
        let _ = state.staging.delete(&job_id).await;
        let _ = state
            .job_store
            .update_status(&job_id, JobStatus::Failed, Some("submission queue full"))
            .await;
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Processing queue is full, try again later".to_string(),
            }),
        )
            .into_response();
    }

    tracing::info!(job_id = %job_id, filename = %original, "Lecture processing enqueued");

    (
        StatusCode::OK,
        Json(ConvertResponse {
            message: "Processing started".to_string(),
            job_id: job_id.to_string(),
            status: "processing".to_string(),
        }),
    )
        .into_response()
}

/// An allowed extension or an audio MIME type suffices; both must miss for
/// a rejection.
fn upload_allowed(filename: &str, mime: &str, allowed_extensions: &[String]) -> bool {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let extension_ok = extension
        .map(|e| allowed_extensions.iter().any(|a| *a == e))
        .unwrap_or(false);
    let mime_ok = mime.starts_with("audio/");

    extension_ok || mime_ok
}
