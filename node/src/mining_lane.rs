//! Dedicated lane for proof-of-work jobs.
//!
//! Mining is CPU-bound with no latency bound of its own, so it never runs on
//! the async request path. A semaphore caps how many jobs mine at once and each
//! job runs on the blocking pool with a [`MiningBudget`] carrying the lane's
//! deadline and a cancel flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use idseal_work::MiningBudget;
use tokio::sync::Semaphore;

use crate::NodeError;

pub struct MiningLane {
    semaphore: Arc<Semaphore>,
    workers: usize,
    deadline: Duration,
}

impl MiningLane {
    pub fn new(workers: usize, deadline: Duration) -> Self {
        let workers = workers.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(workers)),
            workers,
            deadline,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Permits not currently held by a running job.
    pub fn idle_workers(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Run `job` on the blocking pool once a worker permit is free.
    ///
    /// The deadline starts when the permit is acquired. If the job is still
    /// running when it expires, the budget's cancel flag is raised and the
    /// lane waits for the job to observe it, so the returned value is always
    /// what the job actually did.
    pub async fn run<F, R>(&self, job: F) -> Result<R, NodeError>
    where
        F: FnOnce(&MiningBudget) -> R + Send + 'static,
        R: Send + 'static,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| NodeError::LaneClosed)?;

        let cancel = Arc::new(AtomicBool::new(false));
        let budget = MiningBudget::unbounded()
            .with_timeout(self.deadline)
            .with_cancel(Arc::clone(&cancel));

        let mut handle = tokio::task::spawn_blocking(move || job(&budget));
        let joined = match tokio::time::timeout(self.deadline, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                cancel.store(true, Ordering::Relaxed);
                tracing::warn!(
                    deadline_ms = self.deadline.as_millis() as u64,
                    "mining job overran its deadline, cancelling"
                );
                handle.await
            }
        };
        joined.map_err(|e| NodeError::Task(e.to_string()))
    }

    /// Stop accepting jobs. Queued callers get [`NodeError::LaneClosed`].
    pub fn close(&self) {
        self.semaphore.close();
    }
}
