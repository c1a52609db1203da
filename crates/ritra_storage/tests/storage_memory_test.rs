use ritra_storage::{AssetStore, MemoryStorage};

#[tokio::test]
async fn test_named_objects_are_recorded_in_order() {
    let storage = MemoryStorage::new();
    let shared = storage.clone();

    let first = storage
        .put_named("image-section_1-1.png", b"one", "image/png")
        .await
        .unwrap();
    let second = shared.put(b"two", "audio/wav").await.unwrap();

    assert_eq!(first, "memory://image-section_1-1.png");
    assert!(second.ends_with(".wav"));

    let objects = storage.objects();
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0].data, b"one");
    assert_eq!(objects[1].content_type, "audio/wav");
}
