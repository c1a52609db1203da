//! In-memory asset storage.

use crate::AssetStore;
use crate::media_type::extension_for;
use ritra_error::{RitraResult, StorageError, StorageErrorKind};
use std::sync::{Arc, Mutex};

/// An object held by [`MemoryStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    /// Object name
    pub name: String,
    /// URL handed back to the caller
    pub url: String,
    /// MIME type
    pub content_type: String,
    /// Stored bytes
    pub data: Vec<u8>,
}

/// Keeps every stored object in process memory.
///
/// Clones share the same object list.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<Mutex<Vec<StoredAsset>>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored objects, in insertion order.
    pub fn objects(&self) -> Vec<StoredAsset> {
        self.objects
            .lock()
            .map(|objects| objects.clone())
            .unwrap_or_default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }

    /// True if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, name: String, data: &[u8], content_type: &str) -> RitraResult<String> {
        let mut objects = self.objects.lock().map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!("memory store poisoned: {}", e)))
        })?;
        let url = format!("memory://{}", name);
        objects.push(StoredAsset {
            name,
            url: url.clone(),
            content_type: content_type.to_string(),
            data: data.to_vec(),
        });
        Ok(url)
    }
}

#[async_trait::async_trait]
impl AssetStore for MemoryStorage {
    async fn put(&self, data: &[u8], content_type: &str) -> RitraResult<String> {
        let name = format!(
            "asset-{}.{}",
            uuid::Uuid::new_v4().simple(),
            extension_for(content_type)
        );
        self.insert(name, data, content_type)
    }

    async fn put_named(&self, name: &str, data: &[u8], content_type: &str) -> RitraResult<String> {
        self.insert(name.to_string(), data, content_type)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
