//! Title lookup and render collaborators against a local HTTP server.

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use ritra_core::RenderPayload;
use ritra_error::{RitraErrorKind, ServiceErrorKind};
use ritra_interface::{RenderService, TitleResolver};
use ritra_services::{HttpRenderService, SheetsTitleResolver, StaticTitleResolver};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
struct Fake {
    cells: Arc<HashMap<String, Value>>,
    render_status: u16,
    render_body: String,
    received: Arc<Mutex<Vec<Value>>>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

async fn values(
    State(fake): State<Fake>,
    Path((_id, range)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    fake.queries.lock().unwrap().push(query);
    match fake.cells.get(&range) {
        Some(body) => (StatusCode::OK, Json(body.clone())),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "no range"}))),
    }
}

async fn render(State(fake): State<Fake>, Json(body): Json<Value>) -> (StatusCode, String) {
    fake.received.lock().unwrap().push(body);
    (
        StatusCode::from_u16(fake.render_status).unwrap(),
        fake.render_body.clone(),
    )
}

async fn serve(fake: Fake) -> String {
    let app = Router::new()
        .route("/v4/spreadsheets/:id/values/:range", get(values))
        .route("/render", post(render))
        .with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn sheet_fake() -> Fake {
    let mut cells = HashMap::new();
    cells.insert(
        "Books!A2:A2".to_string(),
        json!({"range": "Books!A2:A2", "values": [["  The Left Hand of Darkness "]]}),
    );
    cells.insert("Books!A3:A3".to_string(), json!({"range": "Books!A3:A3"}));
    cells.insert(
        "Books!A4:A4".to_string(),
        json!({"range": "Books!A4:A4", "values": [["   "]]}),
    );
    Fake {
        cells: Arc::new(cells),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_sheets_reads_default_row() {
    let fake = sheet_fake();
    let base = serve(fake.clone()).await;
    let resolver = SheetsTitleResolver::new(
        format!("{base}/v4"),
        "sheet-id",
        "Books",
        2,
        Some("k".to_string()),
    );

    let title = resolver.lookup(None).await.unwrap();

    assert_eq!(title.as_deref(), Some("The Left Hand of Darkness"));
    let queries = fake.queries.lock().unwrap();
    assert_eq!(queries[0].get("key").map(String::as_str), Some("k"));
}

#[tokio::test]
async fn test_sheets_empty_row_is_not_found() {
    let base = serve(sheet_fake()).await;
    let resolver = SheetsTitleResolver::new(format!("{base}/v4"), "sheet-id", "Books", 2, None);

    assert_eq!(resolver.lookup(Some("3")).await.unwrap(), None);
    assert_eq!(resolver.lookup(Some("4")).await.unwrap(), None);
}

#[tokio::test]
async fn test_sheets_rejects_non_numeric_reference() {
    let base = serve(sheet_fake()).await;
    let resolver = SheetsTitleResolver::new(format!("{base}/v4"), "sheet-id", "Books", 2, None);

    let err = resolver.lookup(Some("row two")).await.unwrap_err();

    match err.kind() {
        RitraErrorKind::Service(inner) => {
            assert!(matches!(inner.kind, ServiceErrorKind::InvalidReference(_)))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_sheets_http_error_is_reported() {
    let base = serve(sheet_fake()).await;
    let resolver = SheetsTitleResolver::new(format!("{base}/v4"), "sheet-id", "Books", 9, None);

    let err = resolver.lookup(None).await.unwrap_err();

    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_static_resolver_prefers_reference() {
    let resolver = StaticTitleResolver::new(Some("Default".to_string()));
    assert_eq!(
        resolver.lookup(Some("  Beloved ")).await.unwrap().as_deref(),
        Some("Beloved")
    );
    assert_eq!(
        resolver.lookup(Some("")).await.unwrap().as_deref(),
        Some("Default")
    );
    assert_eq!(StaticTitleResolver::default().lookup(None).await.unwrap(), None);
}

#[tokio::test]
async fn test_render_posts_payload_and_returns_job() {
    let fake = Fake {
        render_status: 200,
        render_body: r#"{"jobId":"job-9"}"#.to_string(),
        ..Default::default()
    };
    let base = serve(fake.clone()).await;
    let service = HttpRenderService::new(format!("{base}/render"), Duration::from_secs(5));
    let payload = RenderPayload::new(
        "https://cdn/a.wav",
        vec!["https://cdn/1.png".to_string(), "https://cdn/2.png".to_string()],
    );

    let job = service.submit(&payload).await.unwrap();

    assert_eq!(job.job_id.as_deref(), Some("job-9"));
    let received = fake.received.lock().unwrap();
    assert_eq!(
        received[0],
        json!({"audio": "https://cdn/a.wav", "images": ["https://cdn/1.png", "https://cdn/2.png"]})
    );
}

#[tokio::test]
async fn test_render_non_json_body_is_kept_as_text() {
    let fake = Fake {
        render_status: 202,
        render_body: "queued".to_string(),
        ..Default::default()
    };
    let base = serve(fake).await;
    let service = HttpRenderService::new(format!("{base}/render"), Duration::from_secs(5));

    let job = service
        .submit(&RenderPayload::new("a", vec!["b".to_string()]))
        .await
        .unwrap();

    assert_eq!(job.response, json!("queued"));
    assert!(job.job_id.is_none());
}

#[tokio::test]
async fn test_render_non_2xx_is_status_error() {
    let fake = Fake {
        render_status: 500,
        render_body: "renderer down".to_string(),
        ..Default::default()
    };
    let base = serve(fake).await;
    let service = HttpRenderService::new(format!("{base}/render"), Duration::from_secs(5));

    let err = service
        .submit(&RenderPayload::new("a", vec!["b".to_string()]))
        .await
        .unwrap_err();

    match err.kind() {
        RitraErrorKind::Service(inner) => assert!(matches!(
            inner.kind,
            ServiceErrorKind::Status {
                status_code: 500,
                ..
            }
        )),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_sheets_stalled_lookup_hits_request_timeout() {
    let app = Router::new().fallback(|| async {
        tokio::time::sleep(Duration::from_secs(30)).await;
        StatusCode::OK
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let resolver = SheetsTitleResolver::new(format!("http://{addr}/v4"), "sheet-id", "Books", 2, None)
        .with_timeout(Duration::from_millis(200));

    let started = std::time::Instant::now();
    let err = resolver.lookup(None).await.unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(5));
    match err.kind() {
        RitraErrorKind::Service(inner) => assert!(matches!(inner.kind, ServiceErrorKind::Http(_))),
        other => panic!("unexpected error: {other}"),
    }
}
