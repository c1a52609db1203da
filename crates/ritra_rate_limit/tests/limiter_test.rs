use ritra_core::RateLimitConfig;
use ritra_rate_limit::RateLimiter;
use std::time::Duration;

#[tokio::test]
async fn test_unlimited_never_blocks() {
    let limiter = RateLimiter::unlimited();
    assert!(limiter.is_unlimited());
    let guards: Vec<_> = (0..100).filter_map(|_| limiter.try_acquire()).collect();
    assert_eq!(guards.len(), 100);
}

#[tokio::test]
async fn test_concurrent_limit_releases_on_drop() {
    let limiter = RateLimiter::new(&RateLimitConfig {
        requests_per_minute: None,
        max_concurrent: Some(1),
    });

    let guard = limiter.try_acquire().expect("first slot");
    assert!(limiter.try_acquire().is_none());

    drop(guard);
    assert!(limiter.try_acquire().is_some());
}

#[tokio::test]
async fn test_rpm_limit_blocks_after_burst() {
    let limiter = RateLimiter::new(&RateLimitConfig {
        requests_per_minute: Some(2),
        max_concurrent: None,
    });

    assert!(limiter.try_acquire().is_some());
    assert!(limiter.try_acquire().is_some());
    assert!(limiter.try_acquire().is_none());
}

#[tokio::test]
async fn test_clones_share_slots() {
    let limiter = RateLimiter::new(&RateLimitConfig {
        requests_per_minute: None,
        max_concurrent: Some(1),
    });
    let clone = limiter.clone();

    let _guard = limiter.acquire().await;
    let waited = tokio::time::timeout(Duration::from_millis(50), clone.acquire()).await;
    assert!(waited.is_err());
}
