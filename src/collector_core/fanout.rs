//! Bounded fan-out / collect
//!
//! Runs one lookup task per work item and gathers every outcome through a
//! multi-producer channel. In-flight work is bounded by a staggered batch
//! barrier: after every K-th submission the collector waits for the whole
//! batch to finish before submitting more. Batches are never pipelined.
//!
//! ```text
//! items ─┬─ spawn ─┐
//!        ├─ spawn ─┼─ (batch of K) ── join barrier ── next batch ...
//!        └─ spawn ─┘
//!             │
//!             └─ mpsc ──► drained after the last barrier ──► Vec<Collected>
//! ```
//!
//! Every submitted item yields exactly one [`Collected`] entry. A lookup
//! that fails is recorded as `Err`; a lookup task that dies before reporting
//! is recorded as `Err(E::from(JoinError))`. Nothing is retried and the
//! result order is unspecified.

use crate::config::ConfigError;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

/// Upper bound on lookups in flight for one collector run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyLimit(usize);

impl ConcurrencyLimit {
    pub fn new(limit: usize) -> Result<Self, ConfigError> {
        if limit == 0 {
            return Err(ConfigError::InvalidValue("concurrency must be at least 1".to_string()));
        }
        Ok(Self(limit))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

/// Outcome of one work item
#[derive(Debug)]
pub struct Collected<W, T, E> {
    pub item: W,
    pub outcome: Result<T, E>,
}

impl<W, T, E> Collected<W, T, E> {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BoundedCollector {
    limit: ConcurrencyLimit,
}

impl BoundedCollector {
    pub fn new(limit: ConcurrencyLimit) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> ConcurrencyLimit {
        self.limit
    }

    /// Run `lookup` over every item, at most `limit` at a time
    ///
    /// Returns once all items were submitted and every task completed.
    pub async fn collect<W, T, E, F, Fut>(&self, items: Vec<W>, lookup: F) -> Vec<Collected<W, T, E>>
    where
        W: Clone + Send + 'static,
        T: Send + 'static,
        E: From<JoinError> + Send + 'static,
        F: Fn(W) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let total = items.len();
        let limit = self.limit.get();
        let (tx, mut rx) = mpsc::unbounded_channel::<Collected<W, T, E>>();
        let mut batch: Vec<(W, JoinHandle<()>)> = Vec::with_capacity(limit.min(total));
        let mut batches = 0usize;

        for (index, item) in items.into_iter().enumerate() {
            let task_tx = tx.clone();
            let task_item = item.clone();
            let lookup_future = lookup(item.clone());

            let handle = tokio::spawn(async move {
                let outcome = lookup_future.await;
                // Receiver outlives every task; a send failure cannot happen here
                let _ = task_tx.send(Collected {
                    item: task_item,
                    outcome,
                });
            });
            batch.push((item, handle));

            if (index + 1) % limit == 0 {
                Self::join_batch(&mut batch, &tx).await;
                batches += 1;
                log::debug!("   ├─ batch {} complete ({}/{} submitted)", batches, index + 1, total);
            }
        }

        if !batch.is_empty() {
            Self::join_batch(&mut batch, &tx).await;
            batches += 1;
        }

        drop(tx);

        let mut results = Vec::with_capacity(total);
        while let Some(collected) = rx.recv().await {
            results.push(collected);
        }

        log::debug!(
            "   └─ collected {} results from {} items in {} batch(es)",
            results.len(),
            total,
            batches
        );

        results
    }

    /// Wait for every task of the current batch; a task that died without
    /// reporting is recorded as a failure for its item
    async fn join_batch<W, T, E>(
        batch: &mut Vec<(W, JoinHandle<()>)>,
        tx: &mpsc::UnboundedSender<Collected<W, T, E>>,
    ) where
        E: From<JoinError>,
    {
        for (item, handle) in batch.drain(..) {
            if let Err(join_error) = handle.await {
                log::warn!("⚠️  Lookup task failed before reporting: {}", join_error);
                let _ = tx.send(Collected {
                    item,
                    outcome: Err(E::from(join_error)),
                });
            }
        }
    }
}
