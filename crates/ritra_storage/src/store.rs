//! Storage trait definition and backend selection.

use crate::{FileSystemStorage, GcsStorage, MemoryStorage};
use ritra_core::{StorageBackend, StorageConfig};
use ritra_error::RitraResult;
use std::sync::Arc;

/// Durable byte storage that hands back a fetchable URL.
///
/// Implementations are shared by every concurrent task in a run and must be
/// safe to call concurrently.
#[async_trait::async_trait]
pub trait AssetStore: Send + Sync {
    /// Store bytes under a backend-chosen name and return the public URL.
    async fn put(&self, data: &[u8], content_type: &str) -> RitraResult<String>;

    /// Store bytes under a caller-suggested object name.
    ///
    /// Backends that address content by hash may ignore the name.
    async fn put_named(&self, name: &str, data: &[u8], content_type: &str) -> RitraResult<String> {
        let _ = name;
        self.put(data, content_type).await
    }

    /// Backend name for logs (e.g., "filesystem", "gcs").
    fn backend_name(&self) -> &'static str;
}

/// Build the configured backend.
///
/// # Errors
///
/// Returns an error for an unknown backend, a missing bucket, or a filesystem
/// root that cannot be created.
pub fn store_from_config(config: &StorageConfig) -> RitraResult<Arc<dyn AssetStore>> {
    let store: Arc<dyn AssetStore> = match config.backend_kind()? {
        StorageBackend::Filesystem => Arc::new(
            FileSystemStorage::new(&config.path)?.with_public_base_url(config.public_base_url.clone()),
        ),
        StorageBackend::Gcs => Arc::new(GcsStorage::from_config(config)?),
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
    };
    tracing::info!(backend = store.backend_name(), "Asset store ready");
    Ok(store)
}
