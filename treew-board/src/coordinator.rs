//! Optimistic reorder coordinator
//!
//! Owns one sibling set (the lists of a board, or the cards of a list) and
//! runs every reorder through the same cycle:
//!
//! ```text
//! Idle ──reorder──▶ Pending(snapshot) ──persist ok──▶ Committed
//!                                     └─error/timeout─▶ RolledBack
//! ```
//!
//! The optimistic order is published before the remote store is asked to
//! persist it. On success the server's position for the moved item becomes
//! part of the new baseline; on failure the snapshot is restored verbatim
//! and the user is notified once. Failures are never retried.
//!
//! A reorder is "in flight" while it holds the reorder slot, a separate async
//! mutex from the one guarding the baseline. [`ConcurrencyPolicy::Queue`]
//! waits for the slot and [`ConcurrencyPolicy::Reject`] refuses when it is
//! taken. Short baseline reads and replacements never count as in flight.

use crate::engine::{validate_siblings, AppliedReorder, PositionEngine};
use crate::error::{BoardError, Result};
use crate::logging::Pretty;
use crate::notify::NotificationSink;
use crate::selection::Subscription;
use crate::store::{RemoteStore, StoreError};
use crate::types::{sort_siblings, ItemId, OrderedItem, Snapshot};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::{debug, info, warn};
use treew_config::{ConcurrencyPolicy, ConfigProvider, ReorderSettings};

/// Where the coordinator is in its reorder cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReorderPhase {
    /// Nothing attempted yet, or the set was replaced
    Idle,
    /// Optimistic order published, waiting on the remote store
    Pending {
        snapshot: Snapshot,
        moving: ItemId,
        position: f64,
    },
    /// Last reorder was confirmed
    Committed { moved: ItemId, position: f64 },
    /// Last reorder failed and the snapshot was restored
    RolledBack { moved: ItemId },
}

/// Successful result of a reorder
#[derive(Debug, Clone, PartialEq)]
pub enum ReorderOutcome {
    /// The item already sat at the requested index
    Unchanged,
    /// The reorder was persisted
    Committed {
        id: ItemId,
        /// Authoritative position as confirmed by the store
        position: f64,
        /// Display index in the committed baseline
        index: usize,
        renumbered: bool,
    },
}

/// Keeps one sibling set and applies reorders optimistically
pub struct ReorderCoordinator {
    engine: PositionEngine,
    store: Arc<dyn RemoteStore>,
    sink: Arc<dyn NotificationSink>,
    policy: ConcurrencyPolicy,
    persist_timeout: Duration,
    reorder_slot: Mutex<()>,
    baseline: Mutex<Snapshot>,
    current: watch::Sender<Vec<OrderedItem>>,
    phase: watch::Sender<ReorderPhase>,
}

impl ReorderCoordinator {
    /// Create a coordinator over `siblings` with default settings
    pub fn new(
        siblings: Vec<OrderedItem>,
        store: Arc<dyn RemoteStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self> {
        validate_siblings(&siblings)?;
        let mut siblings = siblings;
        sort_siblings(&mut siblings);

        let defaults = ReorderSettings::default();
        let (current, _) = watch::channel(siblings.clone());
        let (phase, _) = watch::channel(ReorderPhase::Idle);

        Ok(Self {
            engine: PositionEngine::new(),
            store,
            sink,
            policy: defaults.concurrency,
            persist_timeout: defaults.persist_timeout(),
            reorder_slot: Mutex::new(()),
            baseline: Mutex::new(Snapshot::capture(&siblings)),
            current,
            phase,
        })
    }

    /// Create a coordinator with settings loaded through `provider`
    pub fn configured(
        siblings: Vec<OrderedItem>,
        store: Arc<dyn RemoteStore>,
        sink: Arc<dyn NotificationSink>,
        provider: &ConfigProvider,
    ) -> Result<Self> {
        let settings = provider.load()?;
        Self::new(siblings, store, sink)?.with_settings(&settings)
    }

    /// Apply settings (spacing, policy and deadline) after validating them
    pub fn with_settings(mut self, settings: &ReorderSettings) -> Result<Self> {
        self.engine = PositionEngine::from_settings(settings)?;
        self.policy = settings.concurrency;
        self.persist_timeout = settings.persist_timeout();
        Ok(self)
    }

    pub fn with_policy(mut self, policy: ConcurrencyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_persist_timeout(mut self, timeout: Duration) -> Self {
        self.persist_timeout = timeout;
        self
    }

    pub fn engine(&self) -> &PositionEngine {
        &self.engine
    }

    pub fn policy(&self) -> ConcurrencyPolicy {
        self.policy
    }

    /// Caller-visible order, including any optimistic change in flight
    pub fn current(&self) -> Vec<OrderedItem> {
        self.current.borrow().clone()
    }

    /// Follow the caller-visible order
    pub fn subscribe(&self) -> Subscription<Vec<OrderedItem>> {
        Subscription::from(self.current.subscribe())
    }

    pub fn phase(&self) -> ReorderPhase {
        self.phase.borrow().clone()
    }

    /// Follow phase transitions
    pub fn subscribe_phase(&self) -> Subscription<ReorderPhase> {
        Subscription::from(self.phase.subscribe())
    }

    /// Last committed order. Waits for an in-flight reorder to resolve.
    pub async fn baseline(&self) -> Snapshot {
        self.baseline.lock().await.clone()
    }

    /// Replace the whole set, e.g. after reloading it from the server
    pub async fn replace(&self, siblings: Vec<OrderedItem>) -> Result<()> {
        validate_siblings(&siblings)?;
        let mut siblings = siblings;
        sort_siblings(&mut siblings);

        let mut baseline = self.baseline.lock().await;
        *baseline = Snapshot::capture(&siblings);
        self.current.send_replace(siblings);
        self.phase.send_replace(ReorderPhase::Idle);
        Ok(())
    }

    /// Move `moving_id` to `target_index` optimistically and persist it.
    ///
    /// `target_index` follows [`PositionEngine::apply_reorder`]. Contract
    /// violations fail before anything is published. Persistence failures
    /// and deadline expiry restore the snapshot, notify the user, and are
    /// returned as errors.
    pub async fn reorder_with_commit(
        &self,
        moving_id: &ItemId,
        target_index: usize,
    ) -> Result<ReorderOutcome> {
        let (_slot, mut baseline) = self.acquire().await?;
        let snapshot = baseline.clone();

        let applied = self
            .engine
            .apply_reorder(snapshot.items(), moving_id, target_index)
            .inspect_err(|e| warn!(item = %moving_id, "Rejected reorder: {}", e))?;

        if applied.is_noop() {
            debug!(item = %moving_id, index = target_index, "Item already in place");
            return Ok(ReorderOutcome::Unchanged);
        }

        let in_flight = self.publish_optimistic(&snapshot, &applied);
        let started = Instant::now();
        let result = tokio::time::timeout(self.persist_timeout, self.persist(&applied)).await;
        in_flight.resolve();

        match result {
            Ok(Ok(confirmed)) => {
                let (committed, position) = self.committed_order(&applied, confirmed);
                let index = committed
                    .iter()
                    .position(|item| &item.id == moving_id)
                    .unwrap_or(applied.to_index);

                *baseline = Snapshot::capture(&committed);
                self.current.send_replace(committed);
                self.phase.send_replace(ReorderPhase::Committed {
                    moved: moving_id.clone(),
                    position,
                });

                info!(
                    item = %moving_id,
                    position,
                    index,
                    renumbered = applied.renumbered,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Reorder committed"
                );
                self.sink.notify_success(
                    "Order updated",
                    &format!("Moved {} to position {}", moving_id, index + 1),
                );

                Ok(ReorderOutcome::Committed {
                    id: moving_id.clone(),
                    position,
                    index,
                    renumbered: applied.renumbered,
                })
            }
            Ok(Err(source)) => {
                self.roll_back(&snapshot, moving_id);
                self.sink.notify_failure(
                    "Reorder failed",
                    &format!("Could not move {}: {}", moving_id, source),
                );
                Err(BoardError::persistence(moving_id.as_str(), source))
            }
            Err(_) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                self.roll_back(&snapshot, moving_id);
                self.sink.notify_failure(
                    "Reorder failed",
                    &format!("Moving {} timed out after {}ms", moving_id, elapsed_ms),
                );
                Err(BoardError::PersistTimeout {
                    id: moving_id.to_string(),
                    elapsed_ms,
                })
            }
        }
    }

    /// Take the reorder slot according to the policy, then the baseline
    async fn acquire(&self) -> Result<(MutexGuard<'_, ()>, MutexGuard<'_, Snapshot>)> {
        let slot = match self.policy {
            ConcurrencyPolicy::Queue => self.reorder_slot.lock().await,
            ConcurrencyPolicy::Reject => self.reorder_slot.try_lock().map_err(|_| {
                debug!("Reorder rejected, another one is in flight");
                BoardError::ReorderInFlight
            })?,
        };
        Ok((slot, self.baseline.lock().await))
    }

    fn publish_optimistic(&self, snapshot: &Snapshot, applied: &AppliedReorder) -> InFlight<'_> {
        debug!("Optimistic order: {}", Pretty(&applied.siblings));
        self.phase.send_replace(ReorderPhase::Pending {
            snapshot: snapshot.clone(),
            moving: applied.moved_id.clone(),
            position: applied.new_position,
        });
        self.current.send_replace(applied.siblings.clone());

        InFlight {
            coordinator: self,
            snapshot: Some(snapshot.clone()),
            moving: applied.moved_id.clone(),
        }
    }

    /// One update goes through `persist_position`, a renumbered set through
    /// `persist_batch_positions`
    async fn persist(
        &self,
        applied: &AppliedReorder,
    ) -> std::result::Result<Option<OrderedItem>, StoreError> {
        match applied.updates.as_slice() {
            [single] => self
                .store
                .persist_position(&single.id, single.position)
                .await
                .map(Some),
            updates => self
                .store
                .persist_batch_positions(updates)
                .await
                .map(|()| None),
        }
    }

    /// Optimistic order with the server's answer folded in
    fn committed_order(
        &self,
        applied: &AppliedReorder,
        confirmed: Option<OrderedItem>,
    ) -> (Vec<OrderedItem>, f64) {
        let mut committed = applied.siblings.clone();
        let mut position = applied.new_position;

        match confirmed {
            Some(item) if item.id == applied.moved_id && item.position.is_finite() => {
                if item.position != applied.new_position {
                    debug!(
                        item = %item.id,
                        requested = applied.new_position,
                        confirmed = item.position,
                        "Server adjusted position"
                    );
                }
                position = item.position;
                if let Some(moved) = committed.iter_mut().find(|i| i.id == item.id) {
                    moved.position = item.position;
                }
                sort_siblings(&mut committed);
            }
            Some(item) => warn!(
                expected = %applied.moved_id,
                returned = %item.id,
                position = item.position,
                "Ignoring unusable confirmation from store"
            ),
            None => {}
        }

        (committed, position)
    }

    fn roll_back(&self, snapshot: &Snapshot, moving_id: &ItemId) {
        warn!(item = %moving_id, "Rolling back reorder");
        self.current.send_replace(snapshot.items().to_vec());
        self.phase.send_replace(ReorderPhase::RolledBack {
            moved: moving_id.clone(),
        });
    }
}

/// Restores the snapshot if a reorder future is dropped before the store
/// answers
struct InFlight<'a> {
    coordinator: &'a ReorderCoordinator,
    snapshot: Option<Snapshot>,
    moving: ItemId,
}

impl InFlight<'_> {
    fn resolve(mut self) {
        self.snapshot = None;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            warn!(item = %self.moving, "Reorder cancelled before the store answered");
            self.coordinator.roll_back(&snapshot, &self.moving);
        }
    }
}
