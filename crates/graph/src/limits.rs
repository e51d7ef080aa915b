use crate::error::{GraphError, Result};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

pub const MAX_WORKER_CONCURRENCY: usize = 64;
pub const WORKER_CONCURRENCY_ENV: &str = "SEMGRAPH_WORKER_CONCURRENCY";

pub fn default_worker_concurrency() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    (cpus * 2).clamp(1, MAX_WORKER_CONCURRENCY)
}

pub(crate) fn parse_worker_concurrency(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, MAX_WORKER_CONCURRENCY)
}

/// Bounded pool shared by symbol processing and relationship collection of one analysis.
#[derive(Clone)]
pub(crate) struct WorkerPool {
    semaphore: Arc<Semaphore>,
    limit: usize,
}

impl WorkerPool {
    pub(crate) fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    pub(crate) fn limit(&self) -> usize {
        self.limit
    }

    /// Waits for a free slot. The permit is released when dropped by the spawned task.
    pub(crate) async fn acquire(&self) -> Result<OwnedSemaphorePermit> {
        Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| GraphError::Other("worker pool closed".to_string()))
    }
}
