//! ScoreMaintainer: coalescing background rescoring.
//!
//! Requests land in a [`PendingResourceTree`] under one mutex. A single named
//! worker wakes every poll interval, swaps the tree out, and recomputes each
//! distinct triple once. When a swap comes back empty the worker exits; the
//! next request starts a new one.

pub mod pending;

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use footprint_core::traits::{ActivityProvider, Cancellable, CancellationToken};
use footprint_core::types::ResourceTriple;

pub use self::pending::PendingResourceTree;
use crate::score_cache::ScoreCache;

const WORKER_NAME: &str = "footprint-score-maintainer";

/// Lifecycle of the maintainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintainerState {
    Idle,
    Running,
    Stopped,
}

struct Pending {
    tree: PendingResourceTree,
    worker_running: bool,
    stopped: bool,
}

struct Inner {
    pending: Mutex<Pending>,
    /// Held for the duration of every pass so recomputation stays serialized.
    processing: Mutex<()>,
    cache: Arc<ScoreCache>,
    activities: Arc<dyn ActivityProvider>,
    poll_interval: Duration,
    shutdown_tx: Mutex<Option<Sender<()>>>,
    shutdown_rx: Receiver<()>,
    cancel: CancellationToken,
}

pub struct ScoreMaintainer {
    inner: Arc<Inner>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ScoreMaintainer {
    pub fn new(
        cache: Arc<ScoreCache>,
        activities: Arc<dyn ActivityProvider>,
        poll_interval: Duration,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
        Self {
            inner: Arc::new(Inner {
                pending: Mutex::new(Pending {
                    tree: PendingResourceTree::new(),
                    worker_running: false,
                    stopped: false,
                }),
                processing: Mutex::new(()),
                cache,
                activities,
                poll_interval,
                shutdown_tx: Mutex::new(Some(shutdown_tx)),
                shutdown_rx,
                cancel: CancellationToken::new(),
            }),
            worker: Mutex::new(None),
        }
    }

    /// Queue a rescore of `resource` as used by `agent` in the current activity.
    pub fn process_resource(&self, resource: &str, agent: &str) {
        let activity = self.inner.activities.current_activity();
        self.enqueue(ResourceTriple::new(activity, agent, resource));
    }

    /// Queue a rescore of an already-resolved triple.
    pub fn enqueue(&self, triple: ResourceTriple) {
        let mut pending = self.inner.lock_pending();
        if pending.stopped {
            tracing::debug!(%triple, "score maintainer stopped, request dropped");
            return;
        }
        pending.tree.insert(triple);
        if pending.worker_running {
            return;
        }
        pending.worker_running = true;

        let inner = Arc::clone(&self.inner);
        let spawned = std::thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || inner.run_worker());
        match spawned {
            Ok(handle) => {
                if let Ok(mut slot) = self.worker.lock() {
                    // The previous worker has already exited.
                    *slot = Some(handle);
                }
            }
            Err(e) => {
                pending.worker_running = false;
                tracing::warn!(error = %e, "failed to spawn score maintainer");
            }
        }
    }

    /// Recompute everything pending on the calling thread.
    /// Returns the number of triples processed.
    pub fn flush(&self) -> usize {
        let batch = self.inner.lock_pending().tree.take();
        self.inner.process(batch, false)
    }

    /// Number of distinct triples waiting.
    pub fn pending_len(&self) -> usize {
        self.inner.lock_pending().tree.len()
    }

    pub fn state(&self) -> MaintainerState {
        let pending = self.inner.lock_pending();
        if pending.stopped {
            MaintainerState::Stopped
        } else if pending.worker_running {
            MaintainerState::Running
        } else {
            MaintainerState::Idle
        }
    }

    /// Stop the worker, wait for it, then drain whatever is still pending.
    pub fn shutdown(&self) {
        {
            let mut pending = self.inner.lock_pending();
            if pending.stopped {
                return;
            }
            pending.stopped = true;
        }
        self.inner.cancel.cancel();
        if let Ok(mut tx) = self.inner.shutdown_tx.lock() {
            // Dropping the sender disconnects the channel and wakes the worker.
            tx.take();
        }

        let handle = self.worker.lock().ok().and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::warn!("score maintainer panicked");
            }
        }

        let drained = self.flush();
        tracing::info!(drained, "score maintainer stopped");
    }
}

impl Drop for ScoreMaintainer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    fn lock_pending(&self) -> MutexGuard<'_, Pending> {
        // A panic while holding this lock leaves the tree consistent.
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn run_worker(&self) {
        tracing::debug!("score maintainer started");
        loop {
            match self.shutdown_rx.recv_timeout(self.poll_interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    self.lock_pending().worker_running = false;
                    break;
                }
            }

            let batch = {
                let mut pending = self.lock_pending();
                if pending.tree.is_empty() {
                    pending.worker_running = false;
                    break;
                }
                pending.tree.take()
            };
            self.process(batch, true);
        }
        tracing::debug!("score maintainer idle");
    }

    /// Recompute `batch`, current activity first. A cancellable pass puts
    /// unprocessed triples back when the token fires.
    fn process(&self, batch: PendingResourceTree, cancellable: bool) -> usize {
        if batch.is_empty() {
            return 0;
        }
        let _serial = self
            .processing
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let current = self.activities.current_activity();
        let mut triples = batch.into_ordered(&current).into_iter();
        let mut processed = 0;
        while let Some(triple) = triples.next() {
            if cancellable && self.cancel.is_cancelled() {
                let mut pending = self.lock_pending();
                pending.tree.insert(triple);
                pending.tree.extend(triples);
                break;
            }
            self.cache.update_score(&triple);
            processed += 1;
        }
        tracing::debug!(processed, "maintenance pass done");
        processed
    }
}
