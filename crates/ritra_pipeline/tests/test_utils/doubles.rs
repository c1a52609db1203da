//! Resolver, store, render and progress doubles.

use async_trait::async_trait;
use ritra_core::RenderPayload;
use ritra_error::{RitraResult, ServiceError, ServiceErrorKind, StorageError, StorageErrorKind};
use ritra_interface::{RenderJob, RenderService, TitleResolver};
use ritra_pipeline::{ProgressEvent, ProgressSink};
use ritra_storage::{AssetStore, MemoryStorage};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Resolver answering every lookup the same way.
pub struct FixedTitleResolver {
    answer: Result<Option<String>, String>,
    hang: bool,
    lookups: AtomicUsize,
}

impl FixedTitleResolver {
    pub fn title(title: &str) -> Self {
        Self {
            answer: Ok(Some(title.to_string())),
            hang: false,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self {
            answer: Ok(None),
            hang: false,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            hang: false,
            lookups: AtomicUsize::new(0),
        }
    }

    /// Resolver that never answers.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::empty()
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TitleResolver for FixedTitleResolver {
    async fn lookup(&self, _reference: Option<&str>) -> RitraResult<Option<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.hang {
            return std::future::pending().await;
        }
        match &self.answer {
            Ok(title) => Ok(title.clone()),
            Err(message) => Err(ServiceError::new(ServiceErrorKind::Http(message.clone())).into()),
        }
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Memory store that rejects its first `failures` writes.
pub struct FlakyStore {
    inner: MemoryStorage,
    remaining_failures: AtomicUsize,
}

impl FlakyStore {
    pub fn new(failures: usize) -> Self {
        Self {
            inner: MemoryStorage::new(),
            remaining_failures: AtomicUsize::new(failures),
        }
    }

    pub fn inner(&self) -> &MemoryStorage {
        &self.inner
    }

    fn check(&self) -> RitraResult<()> {
        let failing = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StorageError::new(StorageErrorKind::Upload("bucket unavailable".into())).into());
        }
        Ok(())
    }
}

#[async_trait]
impl AssetStore for FlakyStore {
    async fn put(&self, data: &[u8], content_type: &str) -> RitraResult<String> {
        self.check()?;
        self.inner.put(data, content_type).await
    }

    async fn put_named(&self, name: &str, data: &[u8], content_type: &str) -> RitraResult<String> {
        self.check()?;
        self.inner.put_named(name, data, content_type).await
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}

/// Store whose uploads never complete.
#[derive(Default)]
pub struct StalledStore {
    attempts: AtomicUsize,
}

impl StalledStore {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetStore for StalledStore {
    async fn put(&self, _data: &[u8], _content_type: &str) -> RitraResult<String> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    async fn put_named(&self, _name: &str, _data: &[u8], _content_type: &str) -> RitraResult<String> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    fn backend_name(&self) -> &'static str {
        "stalled"
    }
}

/// Render service that records payloads.
pub struct RecordingRenderService {
    fail: bool,
    hang: bool,
    payloads: Mutex<Vec<RenderPayload>>,
}

impl RecordingRenderService {
    pub fn accepting() -> Self {
        Self {
            fail: false,
            hang: false,
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            fail: true,
            hang: false,
            payloads: Mutex::new(Vec::new()),
        }
    }

    /// Records the payload, then never answers.
    pub fn stalled() -> Self {
        Self {
            fail: false,
            hang: true,
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn payloads(&self) -> Vec<RenderPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl RenderService for RecordingRenderService {
    async fn submit(&self, payload: &RenderPayload) -> RitraResult<RenderJob> {
        self.payloads.lock().unwrap().push(payload.clone());
        if self.hang {
            return std::future::pending().await;
        }
        if self.fail {
            return Err(ServiceError::new(ServiceErrorKind::Status {
                status_code: 500,
                message: "renderer down".to_string(),
            })
            .into());
        }
        Ok(RenderJob::from_response(serde_json::json!({ "jobId": "job-1" })))
    }
}

/// Sink that keeps every event.
#[derive(Default)]
pub struct RecordingProgressSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgressSink {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgressSink {
    fn emit(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
