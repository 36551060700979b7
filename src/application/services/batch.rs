//! Sequential best-effort batch execution shared by every plugin verb

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::application::errors::TransitionError;
use crate::domain::entities::{BatchReport, Transition};

/// Per-plugin-name mutual exclusion.
///
/// A guard is held for one name's whole transition, including the fresh
/// state read that decides it, so two commands touching the same plugin
/// never interleave. Entries nobody holds or waits on are pruned.
#[derive(Default)]
pub struct NameLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl NameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, name: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(name.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of names currently held or waited on
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Drives one transition over a list of plugin names.
///
/// Names are deduplicated (first occurrence wins) and processed strictly in
/// order; each name runs under its lock and the per-name timeout, and its
/// outcome is captured in the report without affecting the others.
#[derive(Clone)]
pub struct BatchRunner {
    locks: Arc<NameLocks>,
    timeout: Duration,
}

impl BatchRunner {
    pub fn new(locks: Arc<NameLocks>, timeout: Duration) -> Self {
        Self { locks, timeout }
    }

    /// Runs `op` for every distinct name. An `Err(E)` from `op` is a query
    /// failure rather than a per-name outcome and aborts the batch.
    pub async fn try_run<'a, E, F, Fut>(
        &self,
        transition: Transition,
        names: &'a [String],
        mut op: F,
    ) -> Result<BatchReport, E>
    where
        F: FnMut(&'a str) -> Fut,
        Fut: Future<Output = Result<Result<(), TransitionError>, E>>,
    {
        let mut report = BatchReport::new();

        for name in distinct(names) {
            let _guard = self.locks.acquire(name).await;
            debug!("{} {}: lock acquired", transition, name);

            let result = match tokio::time::timeout(self.timeout, op(name)).await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => return Err(e),
                Err(_) => Err(TransitionError::Timeout),
            };

            match &result {
                Ok(()) => info!("{} {}: now {}", transition, name, transition.target()),
                Err(TransitionError::Collaborator(_) | TransitionError::Timeout) => {
                    warn!("{} {}: {}", transition, name, transition.describe(&result))
                }
                Err(e) => debug!("{} {}: skipped, {}", transition, name, e),
            }

            report.insert(name, transition.describe(&result));
        }

        Ok(report)
    }

    /// Same as [`try_run`](Self::try_run) for operations with no query step
    pub async fn run<'a, F, Fut>(&self, transition: Transition, names: &'a [String], mut op: F) -> BatchReport
    where
        F: FnMut(&'a str) -> Fut,
        Fut: Future<Output = Result<(), TransitionError>>,
    {
        let report = self
            .try_run::<Infallible, _, _>(transition, names, |name| {
                let fut = op(name);
                async move { Ok(fut.await) }
            })
            .await;

        match report {
            Ok(report) => report,
            Err(never) => match never {},
        }
    }
}

/// Names in first-occurrence order with duplicates removed
fn distinct(names: &[String]) -> Vec<&str> {
    let mut seen = Vec::with_capacity(names.len());
    for name in names {
        if !seen.contains(&name.as_str()) {
            seen.push(name.as_str());
        }
    }
    seen
}
