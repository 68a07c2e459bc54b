use std::{sync::Arc, time::Duration};

use sporlwatch::{error::ClientError, spotify::RateLimiter};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[tokio::test(start_paused = true)]
async fn test_burst_then_steady_cadence() {
    let limiter = RateLimiter::new(Duration::from_secs(1), 2);
    let cancel = CancellationToken::new();
    let start = Instant::now();

    limiter.acquire(&cancel).await.unwrap();
    limiter.acquire(&cancel).await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(1));

    limiter.acquire(&cancel).await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(1));

    limiter.acquire(&cancel).await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(2));
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_idle_refills_burst_only_up_to_capacity() {
    let limiter = RateLimiter::new(Duration::from_secs(1), 2);
    let cancel = CancellationToken::new();

    limiter.acquire(&cancel).await.unwrap();
    limiter.acquire(&cancel).await.unwrap();

    tokio::time::sleep(Duration::from_secs(10)).await;

    let start = Instant::now();
    limiter.acquire(&cancel).await.unwrap();
    limiter.acquire(&cancel).await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(1));

    limiter.acquire(&cancel).await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_callers_share_one_bucket() {
    let limiter = Arc::new(RateLimiter::new(Duration::from_secs(1), 2));
    let start = Instant::now();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move {
                limiter.acquire(&CancellationToken::new()).await.unwrap();
                Instant::now()
            })
        })
        .collect();

    let mut finished = Vec::new();
    for handle in handles {
        finished.push(handle.await.unwrap() - start);
    }
    finished.sort();

    assert!(finished[1] < Duration::from_millis(1));
    assert!(finished[2] >= Duration::from_secs(1));
    assert!(finished[3] >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_while_waiting() {
    let limiter = Arc::new(RateLimiter::new(Duration::from_secs(10), 1));
    let cancel = CancellationToken::new();
    limiter.acquire(&cancel).await.unwrap();

    let waiter = {
        let limiter = Arc::clone(&limiter);
        let cancel = cancel.clone();
        tokio::spawn(async move { limiter.acquire(&cancel).await })
    };

    tokio::time::sleep(Duration::from_secs(1)).await;
    cancel.cancel();

    let result = waiter.await.unwrap();
    assert!(matches!(result, Err(ClientError::Cancelled)));
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_token_fails_fast() {
    let limiter = RateLimiter::new(Duration::from_secs(1), 2);
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert!(matches!(
        limiter.acquire(&cancel).await,
        Err(ClientError::Cancelled)
    ));

    // the slot was not consumed
    let fresh = CancellationToken::new();
    let start = Instant::now();
    limiter.acquire(&fresh).await.unwrap();
    limiter.acquire(&fresh).await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(1));
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_never_waits() {
    let limiter = RateLimiter::new(Duration::ZERO, 1);
    let cancel = CancellationToken::new();
    let start = Instant::now();

    for _ in 0..100 {
        limiter.acquire(&cancel).await.unwrap();
    }
    assert_eq!(start.elapsed(), Duration::ZERO);
}
