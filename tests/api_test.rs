use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;

use mitschrift::application::ports::{JobStore, NotesStore, StagingStore};
use mitschrift::application::services::PipelineMessage;
use mitschrift::domain::JobStatus;
use mitschrift::infrastructure::jobs::InMemoryJobStore;
use mitschrift::infrastructure::storage::{LocalNotesStore, LocalStagingStore};
use mitschrift::presentation::{AppState, Settings, create_router};

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

struct TestServer {
    router: Router,
    job_store: Arc<dyn JobStore>,
    notes_store: Arc<dyn NotesStore>,
    staging: Arc<dyn StagingStore>,
    receiver: mpsc::Receiver<PipelineMessage>,
    _dirs: (TempDir, TempDir),
}

fn test_server(max_upload_bytes: u64, queue_depth: usize) -> TestServer {
    let uploads = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let mut settings = Settings::default();
    settings.upload.dir = uploads.path().to_path_buf();
    settings.upload.max_bytes = max_upload_bytes;
    settings.pipeline.output_dir = output.path().to_path_buf();

    let job_store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
    let staging: Arc<dyn StagingStore> =
        Arc::new(LocalStagingStore::new(uploads.path().to_path_buf()).unwrap());
    let notes_store: Arc<dyn NotesStore> =
        Arc::new(LocalNotesStore::new(output.path().to_path_buf()).unwrap());

    let (sender, receiver) = mpsc::channel(queue_depth);

    let state = AppState {
        job_store: Arc::clone(&job_store),
        staging: Arc::clone(&staging),
        notes_store: Arc::clone(&notes_store),
        pipeline_sender: sender,
        settings,
    };

    TestServer {
        router: create_router(state),
        job_store,
        notes_store,
        staging,
        receiver,
        _dirs: (uploads, output),
    }
}

fn multipart_upload(filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/convert")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn given_default_public_dir_when_fetching_root_then_landing_page_is_served() {
    let server = test_server(1024, 4);
    let response = server
        .router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("<html"));
}

#[tokio::test]
async fn given_healthy_server_when_checking_health_then_ok() {
    let server = test_server(1024, 4);
    let response = server
        .router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_valid_upload_when_converting_then_processing_response_before_any_pipeline_work() {
    let mut server = test_server(1024, 4);

    let response = server
        .router
        .clone()
        .oneshot(multipart_upload("lecture.mp3", "audio/mpeg", b"ID3fake"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "processing");

    let job_id = json["jobId"].as_str().unwrap();
    let (millis, name) = job_id.split_once('-').unwrap();
    assert!(millis.parse::<i64>().is_ok());
    assert_eq!(name, "lecture.mp3");

    // No worker is draining the queue: the job record exists and is still
    // queued, and the upload is staged on disk.
    let msg = server.receiver.try_recv().unwrap();
    assert_eq!(msg.original_filename, "lecture.mp3");
    assert!(msg.source_path.exists());

    let job = server
        .job_store
        .get(&mitschrift::domain::JobId::from_raw(job_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.status, JobStatus::Queued);
}

#[tokio::test]
async fn given_disallowed_extension_and_mime_when_converting_then_unsupported_media_type() {
    let server = test_server(1024, 4);
    let response = server
        .router
        .oneshot(multipart_upload("report.pdf", "application/pdf", b"%PDF"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Unsupported"));
}

#[tokio::test]
async fn given_allowed_extension_with_generic_mime_when_converting_then_accepted() {
    let server = test_server(1024, 4);
    let response = server
        .router
        .oneshot(multipart_upload(
            "talk.ogg",
            "application/octet-stream",
            b"OggS",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_upload_at_exact_limit_when_converting_then_accepted() {
    let server = test_server(16, 4);
    let response = server
        .router
        .oneshot(multipart_upload("a.mp3", "audio/mpeg", &[0u8; 16]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_upload_one_byte_over_limit_when_converting_then_payload_too_large() {
    let server = test_server(16, 4);
    let response = server
        .router
        .oneshot(multipart_upload("a.mp3", "audio/mpeg", &[0u8; 17]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("maximum"));
}

#[tokio::test]
async fn given_multipart_without_audio_field_when_converting_then_bad_request() {
    let server = test_server(1024, 4);

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"video\"; filename=\"x.mp4\"\r\n\r\ndata\r\n--{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/convert")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = server.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_full_queue_when_converting_then_unavailable_and_job_failed() {
    let server = test_server(1024, 1);

    let first = server
        .router
        .clone()
        .oneshot(multipart_upload("one.mp3", "audio/mpeg", b"a"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = server
        .router
        .clone()
        .oneshot(multipart_upload("two.mp3", "audio/mpeg", b"b"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::SERVICE_UNAVAILABLE);

    // The rejected submission is observable as a failed job.
    let jobs = server.job_store.list().await.unwrap();
    let rejected = jobs
        .iter()
        .find(|j| j.original_filename == "two.mp3")
        .unwrap();
    assert_eq!(rejected.status, JobStatus::Failed);
    assert!(!server.staging.path_for(&rejected.id).exists());
}

#[tokio::test]
async fn given_no_artifacts_when_listing_results_then_empty_array() {
    let server = test_server(1024, 4);
    let response = server
        .router
        .oneshot(Request::get("/api/results").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn given_saved_notes_when_listing_results_then_entries_have_download_urls() {
    let server = test_server(1024, 4);
    server
        .notes_store
        .save("erste", "lecture.mp3")
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    server
        .notes_store
        .save("zweite", "seminar.wav")
        .await
        .unwrap();

    let response = server
        .router
        .oneshot(Request::get("/api/results").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(response).await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    for entry in entries {
        let filename = entry["filename"].as_str().unwrap();
        assert!(filename.ends_with(".txt"));
        assert_eq!(
            entry["downloadUrl"].as_str().unwrap(),
            format!("/api/download/{}", filename)
        );
        assert!(entry["size"].as_u64().unwrap() > 0);
    }
}

#[tokio::test]
async fn given_saved_artifact_when_downloading_then_contents_stream_back() {
    let server = test_server(1024, 4);
    let path = server
        .notes_store
        .save("# Mitschrift\n\n- Punkt eins", "lecture.mp3")
        .await
        .unwrap();
    let filename = path.file_name().unwrap().to_str().unwrap();

    let response = server
        .router
        .oneshot(
            Request::get(format!("/api/download/{}", filename))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"# Mitschrift\n\n- Punkt eins");
}

#[tokio::test]
async fn given_traversal_path_when_downloading_then_never_serves_outside_output_dir() {
    let server = test_server(1024, 4);

    // Raw traversal does not even match the single-segment route.
    let raw = server
        .router
        .clone()
        .oneshot(
            Request::get("/api/download/../../etc/passwd")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(raw.status() == StatusCode::NOT_FOUND || raw.status() == StatusCode::BAD_REQUEST);

    // Encoded separators decode into the path parameter and must be
    // rejected by name validation.
    let encoded = server
        .router
        .clone()
        .oneshot(
            Request::get("/api/download/..%2F..%2Fetc%2Fpasswd")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(
        encoded.status() == StatusCode::NOT_FOUND || encoded.status() == StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn given_unknown_artifact_when_downloading_then_not_found_with_error_body() {
    let server = test_server(1024, 4);
    let response = server
        .router
        .oneshot(
            Request::get("/api/download/missing_notes.txt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn given_submitted_job_when_querying_status_then_record_is_returned() {
    let mut server = test_server(1024, 4);

    let response = server
        .router
        .clone()
        .oneshot(multipart_upload("lecture.mp3", "audio/mpeg", b"abc"))
        .await
        .unwrap();
    let json = body_json(response).await;
    let job_id = json["jobId"].as_str().unwrap().to_string();
    let _ = server.receiver.try_recv();

    let status_response = server
        .router
        .oneshot(
            Request::get(format!("/api/jobs/{}", job_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(status_response.status(), StatusCode::OK);
    let status_json = body_json(status_response).await;
    assert_eq!(status_json["id"], job_id.as_str());
    assert_eq!(status_json["status"], "QUEUED");
    assert_eq!(status_json["originalFilename"], "lecture.mp3");
}

#[tokio::test]
async fn given_unknown_job_when_querying_status_then_not_found() {
    let server = test_server(1024, 4);
    let response = server
        .router
        .oneshot(
            Request::get("/api/jobs/1700000000000-nope.mp3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
