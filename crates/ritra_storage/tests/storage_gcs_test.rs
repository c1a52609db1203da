//! GCS backend against a local HTTP server.

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::put;
use ritra_error::{RitraErrorKind, StorageErrorKind};
use ritra_storage::{AssetStore, GcsStorage};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Upload {
    bucket: String,
    name: String,
    content_type: Option<String>,
    cache_control: Option<String>,
    authorization: Option<String>,
    body: Vec<u8>,
}

#[derive(Clone, Default)]
struct Recorder {
    uploads: Arc<Mutex<Vec<Upload>>>,
    status: Arc<Mutex<Option<StatusCode>>>,
}

async fn record(
    State(recorder): State<Recorder>,
    Path((bucket, name)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let header = |key: &str| {
        headers
            .get(key)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    recorder.uploads.lock().unwrap().push(Upload {
        bucket,
        name,
        content_type: header("content-type"),
        cache_control: header("cache-control"),
        authorization: header("authorization"),
        body: body.to_vec(),
    });
    recorder.status.lock().unwrap().unwrap_or(StatusCode::OK)
}

async fn serve(recorder: Recorder) -> String {
    let app = Router::new()
        .route("/:bucket/*name", put(record))
        .with_state(recorder);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_named_upload_sets_headers_and_returns_public_url() {
    let recorder = Recorder::default();
    let base = serve(recorder.clone()).await;
    let storage = GcsStorage::new(&base, "ritra-assets", Some("token-123".to_string()));

    let url = storage
        .put_named("image-section_2-1700000000000.png", b"png", "image/png")
        .await
        .unwrap();

    assert_eq!(
        url,
        format!("{base}/ritra-assets/image-section_2-1700000000000.png")
    );
    let uploads = recorder.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    let upload = &uploads[0];
    assert_eq!(upload.bucket, "ritra-assets");
    assert_eq!(upload.name, "image-section_2-1700000000000.png");
    assert_eq!(upload.content_type.as_deref(), Some("image/png"));
    assert_eq!(
        upload.cache_control.as_deref(),
        Some("public, max-age=31536000")
    );
    assert_eq!(upload.authorization.as_deref(), Some("Bearer token-123"));
    assert_eq!(upload.body, b"png");
}

#[tokio::test]
async fn test_generated_names_use_extension() {
    let recorder = Recorder::default();
    let base = serve(recorder.clone()).await;
    let storage = GcsStorage::new(&base, "bucket", None);

    let url = storage.put(b"wav", "audio/wav").await.unwrap();

    assert!(url.ends_with(".wav"));
    let uploads = recorder.uploads.lock().unwrap().clone();
    assert!(uploads[0].authorization.is_none());
}

#[tokio::test]
async fn test_rejected_upload_is_an_error() {
    let recorder = Recorder::default();
    *recorder.status.lock().unwrap() = Some(StatusCode::FORBIDDEN);
    let base = serve(recorder.clone()).await;
    let storage = GcsStorage::new(&base, "bucket", None);

    let err = storage.put(b"data", "image/png").await.unwrap_err();

    match err.kind() {
        RitraErrorKind::Storage(inner) => assert!(matches!(
            inner.kind,
            StorageErrorKind::UploadRejected {
                status_code: 403,
                ..
            }
        )),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_stalled_upload_hits_request_timeout() {
    let app = Router::new().fallback(|| async {
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        StatusCode::OK
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let storage = GcsStorage::new(format!("http://{addr}"), "bucket", None)
        .with_timeout(std::time::Duration::from_millis(200));

    let started = std::time::Instant::now();
    let err = storage.put(b"data", "image/png").await.unwrap_err();

    assert!(started.elapsed() < std::time::Duration::from_secs(5));
    match err.kind() {
        RitraErrorKind::Storage(inner) => {
            assert!(matches!(inner.kind, StorageErrorKind::Upload(_)))
        }
        other => panic!("unexpected error: {other}"),
    }
}
