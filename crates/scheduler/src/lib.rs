//! Background scheduler (C7): post-commit cache invalidation and event
//! publication, each isolated behind its own timeout (spec.md §4.7, §5).
//!
//! Tasks run after the request's C1 transaction has already committed.
//! A task that panics or times out is logged and dropped; it never
//! propagates to the request that scheduled it or to sibling tasks —
//! `tokio::spawn` gives each one its own unwind boundary.

use std::future::Future;
use std::time::Duration;

use tracing::error;

/// Per-task deadline for a cache invalidation/back-fill operation.
pub const CACHE_TASK_TIMEOUT: Duration = Duration::from_secs(2);

/// Per-task deadline for event-bus publication.
pub const EVENT_TASK_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-task deadline for an asynchronous AML analysis run, triggered
/// optionally by C6 after a wallet mutation commits (spec.md §4.6 step 5).
pub const AML_TASK_TIMEOUT: Duration = Duration::from_secs(10);

/// Spawn `fut` in its own task with a deadline. On timeout or panic the
/// failure is logged at `error` level and otherwise swallowed.
pub fn spawn_isolated<F>(task_name: &'static str, timeout: Duration, fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        if tokio::time::timeout(timeout, fut).await.is_err() {
            error!(task = task_name, timeout_ms = timeout.as_millis() as u64, "background task timed out");
        }
    });
}

/// Schedule a cache-invalidation task (spec.md §4.7: 2s deadline).
pub fn schedule_cache_task<F>(fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    spawn_isolated("cache_invalidation", CACHE_TASK_TIMEOUT, fut);
}

/// Schedule an event-publication task (spec.md §4.7: 5s deadline).
pub fn schedule_event_task<F>(fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    spawn_isolated("event_publication", EVENT_TASK_TIMEOUT, fut);
}

/// Schedule an optional asynchronous AML analysis run (spec.md §4.6 step 5,
/// §4.7).
pub fn schedule_aml_task<F>(fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    spawn_isolated("aml_analysis", AML_TASK_TIMEOUT, fut);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_task_runs_to_completion() {
        let flag = Arc::new(AtomicBool::new(false));
        let flag2 = flag.clone();
        schedule_cache_task(async move {
            flag2.store(true, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(flag.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_task_timeout_does_not_panic_caller() {
        schedule_cache_task(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
