//! Filesystem-based asset storage.
//!
//! Files are content-addressed, so storing the same bytes twice yields the
//! same path and URL.

use crate::media_type::extension_for;
use crate::{AssetStore, MediaType};
use ritra_error::{RitraResult, StorageError, StorageErrorKind};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Filesystem storage backend.
///
/// Layout: `{base_path}/{type}/{hash[0:2]}/{hash[2:4]}/{hash}.{ext}`
///
/// ```text
/// ./assets/
/// ├── images/
/// │   └── ab/
/// │       └── cd/
/// │           └── abcdef123456....png
/// └── audio/
///     └── 12/
///         └── 34/
///             └── 123456abcdef....wav
/// ```
///
/// URLs are `public_base_url` joined with the relative path when a base URL is
/// configured (a static file server in front of the directory), otherwise
/// `file://` URLs.
pub struct FileSystemStorage {
    base_path: PathBuf,
    public_base_url: Option<String>,
}

impl FileSystemStorage {
    /// Create a new filesystem storage backend.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or resolved.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> RitraResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;
        let base_path = base_path.canonicalize().map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidConfig(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created filesystem storage");
        Ok(Self {
            base_path,
            public_base_url: None,
        })
    }

    /// Serve URLs from `base_url` instead of `file://` paths.
    pub fn with_public_base_url(mut self, base_url: Option<String>) -> Self {
        self.public_base_url = base_url.map(|url| url.trim_end_matches('/').to_string());
        self
    }

    /// Root directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn compute_hash(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    fn relative_path(hash: &str, content_type: &str) -> PathBuf {
        let media_type = MediaType::from_content_type(content_type);
        PathBuf::from(media_type.dir())
            .join(&hash[0..2])
            .join(&hash[2..4])
            .join(format!("{}.{}", hash, extension_for(content_type)))
    }

    fn url_for(&self, relative: &Path, absolute: &Path) -> String {
        match &self.public_base_url {
            Some(base) => {
                let segments: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect();
                format!("{}/{}", base, segments.join("/"))
            }
            None => format!("file://{}", absolute.display()),
        }
    }
}

#[async_trait::async_trait]
impl AssetStore for FileSystemStorage {
    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    async fn put(&self, data: &[u8], content_type: &str) -> RitraResult<String> {
        let hash = Self::compute_hash(data);
        let relative = Self::relative_path(&hash, content_type);
        let path = self.base_path.join(&relative);
        let url = self.url_for(&relative, &path);

        // Same bytes, same path
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(hash = %hash, path = %path.display(), "Asset already stored");
            return Ok(url);
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to a unique temp file, then rename. Concurrent writers of the
        // same content must not share a temp path.
        let temp_path = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(
            hash = %hash,
            path = %path.display(),
            size = data.len(),
            "Stored asset"
        );

        Ok(url)
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
