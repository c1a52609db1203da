//! Tests for filesystem storage backend.

use ritra_storage::{AssetStore, FileSystemStorage};
use tempfile::TempDir;

#[tokio::test]
async fn test_put_writes_content_addressed_file() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemStorage::new(temp_dir.path()).unwrap();

    let url = storage.put(b"png bytes", "image/png").await.unwrap();

    assert!(url.starts_with("file://"));
    assert!(url.ends_with(".png"));
    let path = url.trim_start_matches("file://");
    assert!(path.contains("/images/"));
    assert_eq!(std::fs::read(path).unwrap(), b"png bytes");
}

#[tokio::test]
async fn test_deduplication() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemStorage::new(temp_dir.path()).unwrap();

    let first = storage.put(b"same narration", "audio/wav").await.unwrap();
    let second = storage.put(b"same narration", "audio/wav").await.unwrap();

    assert_eq!(first, second);
    assert!(first.contains("/audio/"));
}

#[tokio::test]
async fn test_different_content_different_urls() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemStorage::new(temp_dir.path()).unwrap();

    let a = storage.put(b"first", "image/png").await.unwrap();
    let b = storage.put(b"second", "image/png").await.unwrap();

    assert_ne!(a, b);
}

#[tokio::test]
async fn test_public_base_url() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemStorage::new(temp_dir.path())
        .unwrap()
        .with_public_base_url(Some("https://cdn.example.com/assets/".to_string()));

    let url = storage.put(b"image", "image/png").await.unwrap();

    assert!(url.starts_with("https://cdn.example.com/assets/images/"));
    assert!(!url.contains("//images"));
}

#[tokio::test]
async fn test_named_put_is_content_addressed() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemStorage::new(temp_dir.path()).unwrap();

    let named = storage
        .put_named("image-section_1-1.png", b"bytes", "image/png")
        .await
        .unwrap();
    let plain = storage.put(b"bytes", "image/png").await.unwrap();

    assert_eq!(named, plain);
}

#[tokio::test]
async fn test_concurrent_writes_of_same_content() {
    let temp_dir = TempDir::new().unwrap();
    let storage = std::sync::Arc::new(FileSystemStorage::new(temp_dir.path()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let storage = storage.clone();
            tokio::spawn(async move { storage.put(b"shared", "image/png").await })
        })
        .collect();

    let mut urls = Vec::new();
    for handle in handles {
        urls.push(handle.await.unwrap().unwrap());
    }
    urls.dedup();
    assert_eq!(urls.len(), 1);
}
