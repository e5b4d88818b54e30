//! Bounded-concurrency batch driver.
//!
//! Applies one async operation across many work items with at most
//! `max_concurrency` in flight, collecting results in input order. The
//! driver knows nothing about fetching or summarizing; workers are plain
//! futures producing whatever result type the stage uses.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

/// A worker task that did not run to completion.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The worker panicked; the panic stays contained to its item
    #[error("worker panicked: {0}")]
    Panicked(String),

    /// The worker task was cancelled before finishing
    #[error("worker cancelled")]
    Cancelled,
}

/// Apply `worker` to every item with at most `max_concurrency` in flight.
///
/// Results come back in input order regardless of completion order, exactly
/// one per item. A failing or panicking worker fills its own slot and never
/// cancels siblings; the batch always runs to the end. Progress is logged as
/// a monotonically increasing completed-count.
pub async fn run_batch<I, R, F, Fut>(
    items: Vec<I>,
    max_concurrency: usize,
    worker: F,
) -> Vec<Result<R, BatchError>>
where
    I: Send + 'static,
    R: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
{
    let total = items.len();
    if total == 0 {
        return Vec::new();
    }

    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let completed = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::with_capacity(total);
    for item in items {
        let semaphore = semaphore.clone();
        let completed = completed.clone();
        let fut = worker(item);
        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            let result = fut.await;
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            debug!(completed = done, total = total, "batch progress");
            result
        }));
    }

    // Awaiting handles in spawn order pins results to input order.
    let mut results = Vec::with_capacity(total);
    for handle in handles {
        match handle.await {
            Ok(result) => results.push(Ok(result)),
            Err(e) if e.is_panic() => {
                error!(error = %e, "batch worker panicked");
                results.push(Err(BatchError::Panicked(e.to_string())));
            }
            Err(_) => results.push(Err(BatchError::Cancelled)),
        }
    }

    info!(total = total, "batch complete");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let items = vec!["a", "b", "c"];
        let results = run_batch(items, 2, |name: &'static str| async move {
            let delay = match name {
                "a" => 30,
                "b" => 5,
                _ => 1,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            name
        })
        .await;

        let names: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_concurrency_cap_is_respected() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let items: Vec<usize> = (0..10).collect();
        let results = run_batch(items, 3, |i| {
            let in_flight = in_flight.clone();
            let max_seen = max_seen.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                i
            }
        })
        .await;

        assert_eq!(results.len(), 10);
        assert!(max_seen.load(Ordering::SeqCst) <= 3);
        assert!(max_seen.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_failure_does_not_cancel_siblings() {
        let items: Vec<usize> = (0..5).collect();
        let results = run_batch(items, 2, |i| async move {
            if i == 2 {
                Err(format!("transport error on item {i}"))
            } else {
                Ok(i)
            }
        })
        .await;

        let outcomes: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 4);
        assert!(outcomes[2].is_err());
    }

    #[tokio::test]
    async fn test_panic_is_contained_to_its_slot() {
        let items: Vec<usize> = (0..3).collect();
        let results = run_batch(items, 2, |i| async move {
            if i == 1 {
                panic!("worker exploded");
            }
            i
        })
        .await;

        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(BatchError::Panicked(_))));
        assert!(results[2].is_ok());
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_results() {
        let results: Vec<Result<u32, BatchError>> =
            run_batch(Vec::new(), 4, |i: u32| async move { i }).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_zero_cap_is_clamped_to_one() {
        let items = vec![1u32, 2];
        let results = run_batch(items, 0, |i| async move { i }).await;
        let values: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(values, vec![1, 2]);
    }
}
