//! Fetch scope
//!
//! Every page fetch issued under one repository runs inside one scope. The
//! scope bounds how many fetches run at once and cancels all of them
//! together: a cancelled fetch is dropped where it stands and its result is
//! never delivered.

use crate::error::{Error, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Cancellation and concurrency bound shared by a repository's fetches
#[derive(Debug, Clone)]
pub struct FetchScope {
    token: CancellationToken,
    permits: Arc<Semaphore>,
    runtime: Handle,
}

impl FetchScope {
    /// Create a scope on the current Tokio runtime
    pub fn new(max_concurrent: usize) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| Error::runtime(e.to_string()))?;
        Ok(Self::with_handle(runtime, max_concurrent))
    }

    /// Create a scope that spawns onto `runtime`
    pub fn with_handle(runtime: Handle, max_concurrent: usize) -> Self {
        Self {
            token: CancellationToken::new(),
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            runtime,
        }
    }

    /// Run `task` in the background
    ///
    /// Returns `false` without running anything once the scope is cancelled.
    pub fn spawn<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.token.is_cancelled() {
            return false;
        }

        let token = self.token.clone();
        let permits = Arc::clone(&self.permits);
        self.runtime.spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    debug!("fetch dropped by cancelled scope");
                }
                () = async move {
                    if let Ok(_permit) = permits.acquire_owned().await {
                        task.await;
                    }
                } => {}
            }
        });
        true
    }

    /// Cancel every running and future task
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check whether the scope has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolve once the scope is cancelled
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// Fetch slots currently free
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::{oneshot, Notify};

    #[tokio::test]
    async fn test_spawn_runs_task() {
        let scope = FetchScope::new(2).unwrap();
        let (tx, rx) = oneshot::channel();

        assert!(scope.spawn(async move {
            let _ = tx.send(42);
        }));
        assert_eq!(rx.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_spawn_after_cancel_is_refused() {
        let scope = FetchScope::new(1).unwrap();
        scope.cancel();

        assert!(scope.is_cancelled());
        assert!(!scope.spawn(async {}));
    }

    #[tokio::test]
    async fn test_cancel_drops_running_task() {
        struct DropFlag(Arc<AtomicUsize>);
        impl Drop for DropFlag {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let scope = FetchScope::new(1).unwrap();
        let gate = Arc::new(Notify::new());
        let dropped = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicUsize::new(0));

        let task_gate = Arc::clone(&gate);
        let task_finished = Arc::clone(&finished);
        let flag = DropFlag(Arc::clone(&dropped));
        scope.spawn(async move {
            let _flag = flag;
            task_gate.notified().await;
            task_finished.fetch_add(1, Ordering::SeqCst);
        });

        tokio::task::yield_now().await;
        scope.cancel();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(dropped.load(Ordering::SeqCst), 1);
        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let scope = FetchScope::new(1).unwrap();
        let gate = Arc::new(Notify::new());
        let started = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let gate = Arc::clone(&gate);
            let started = Arc::clone(&started);
            scope.spawn(async move {
                started.fetch_add(1, Ordering::SeqCst);
                gate.notified().await;
            });
        }

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(scope.available_permits(), 0);

        scope.cancel();
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let err = FetchScope::new(1).unwrap_err();
        assert!(matches!(err, Error::Runtime { .. }));
    }
}
