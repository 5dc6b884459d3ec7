//! Optimistic reorder commits and rollbacks against a scripted store

mod common;

use common::{abc, ids, RecordingSink, Reply, ScriptedStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use treew_board::{
    BoardError, ConcurrencyPolicy, OrderedItem, ReorderCoordinator, ReorderOutcome, ReorderPhase,
    ReorderSettings,
};

fn coordinator(store: &Arc<ScriptedStore>, sink: &Arc<RecordingSink>) -> ReorderCoordinator {
    ReorderCoordinator::new(abc(), store.clone(), sink.clone()).unwrap()
}

async fn wait_for_pending(coordinator: &ReorderCoordinator) {
    while !matches!(coordinator.phase(), ReorderPhase::Pending { .. }) {
        tokio::task::yield_now().await;
    }
}

#[test_log::test(tokio::test)]
async fn test_rejected_persist_restores_snapshot_exactly() {
    let store = Arc::new(ScriptedStore::new(Reply::Reject("board is archived".into())));
    let sink = Arc::new(RecordingSink::default());
    let coordinator = coordinator(&store, &sink);
    let before = coordinator.current();

    let err = coordinator
        .reorder_with_commit(&"C".into(), 0)
        .await
        .unwrap_err();

    assert!(matches!(err, BoardError::PersistenceFailed { .. }));
    assert_eq!(coordinator.current(), before);
    assert_eq!(coordinator.baseline().await.items(), before.as_slice());
    assert_eq!(sink.failures(), 1);
    assert_eq!(sink.successes(), 0);
    assert_eq!(
        coordinator.phase(),
        ReorderPhase::RolledBack { moved: "C".into() }
    );
    // Failures are never retried
    assert_eq!(store.call_count(), 1);
}

#[test_log::test(tokio::test)]
async fn test_rejected_batch_restores_every_sibling() {
    let store = Arc::new(ScriptedStore::new(Reply::Reject("conflict".into())));
    let sink = Arc::new(RecordingSink::default());
    let original = vec![OrderedItem::new("A", 0.5), OrderedItem::new("B", 0.75)];
    let coordinator =
        ReorderCoordinator::new(original.clone(), store.clone(), sink.clone()).unwrap();

    // No room left before A, so both keys are rewritten as one batch
    let err = coordinator
        .reorder_with_commit(&"B".into(), 0)
        .await
        .unwrap_err();

    assert!(matches!(err, BoardError::PersistenceFailed { .. }));
    assert_eq!(coordinator.current(), original);
    assert_eq!(coordinator.baseline().await.items(), original.as_slice());
    assert_eq!(sink.failures(), 1);

    let batches = store.batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 2);
    assert!(store.singles.lock().unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_commit_adopts_server_position() {
    let store = Arc::new(ScriptedStore::new(Reply::AcceptAt(275.0)));
    let sink = Arc::new(RecordingSink::default());
    let coordinator = coordinator(&store, &sink);

    let outcome = coordinator
        .reorder_with_commit(&"A".into(), 1)
        .await
        .unwrap();

    // Local guess was the midpoint of B and C
    assert_eq!(store.singles.lock().unwrap()[0].position, 250.0);
    assert_eq!(
        outcome,
        ReorderOutcome::Committed {
            id: "A".into(),
            position: 275.0,
            index: 1,
            renumbered: false,
        }
    );

    let baseline = coordinator.baseline().await;
    let moved = baseline
        .items()
        .iter()
        .find(|item| item.id.as_str() == "A")
        .unwrap();
    assert_eq!(moved.position, 275.0);
    assert_eq!(sink.successes(), 1);
}

#[tokio::test]
async fn test_server_position_can_change_committed_order() {
    let store = Arc::new(ScriptedStore::new(Reply::AcceptAt(350.0)));
    let sink = Arc::new(RecordingSink::default());
    let coordinator = coordinator(&store, &sink);

    let outcome = coordinator
        .reorder_with_commit(&"A".into(), 1)
        .await
        .unwrap();

    assert_eq!(ids(&coordinator.current()), vec!["B", "C", "A"]);
    assert!(matches!(outcome, ReorderOutcome::Committed { index: 2, .. }));
}

#[test_log::test(tokio::test)]
async fn test_persist_deadline_rolls_back() {
    let store = Arc::new(ScriptedStore::new(Reply::Hang));
    let sink = Arc::new(RecordingSink::default());
    let coordinator = coordinator(&store, &sink).with_persist_timeout(Duration::from_millis(30));

    let err = coordinator
        .reorder_with_commit(&"B".into(), 0)
        .await
        .unwrap_err();

    assert!(matches!(err, BoardError::PersistTimeout { .. }));
    assert!(err.is_retryable());
    assert_eq!(coordinator.current(), abc());
    assert_eq!(sink.failures(), 1);
}

#[tokio::test]
async fn test_dropped_reorder_rolls_back() {
    let store = Arc::new(ScriptedStore::new(Reply::Hang));
    let sink = Arc::new(RecordingSink::default());
    let coordinator = coordinator(&store, &sink);

    let abandoned = tokio::time::timeout(
        Duration::from_millis(20),
        coordinator.reorder_with_commit(&"C".into(), 0),
    )
    .await;

    assert!(abandoned.is_err());
    assert_eq!(coordinator.current(), abc());
    assert_eq!(
        coordinator.phase(),
        ReorderPhase::RolledBack { moved: "C".into() }
    );
    // The in-flight slot is free again
    assert_eq!(coordinator.baseline().await.items(), abc().as_slice());
}

#[tokio::test]
async fn test_optimistic_order_visible_before_store_answers() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(ScriptedStore::gated(gate.clone()));
    let sink = Arc::new(RecordingSink::default());
    let coordinator = coordinator(&store, &sink);
    let subscription = coordinator.subscribe();

    let observe = async {
        wait_for_pending(&coordinator).await;
        let seen = (coordinator.current(), subscription.get());
        gate.notify_one();
        seen
    };

    let c_id = "C".into();
    let (result, (current, published)) =
        tokio::join!(coordinator.reorder_with_commit(&c_id, 0), observe);

    result.unwrap();
    assert_eq!(ids(&current), vec!["C", "A", "B"]);
    assert_eq!(current, published);
    assert_eq!(current[0], OrderedItem::new("C", 50.0));
    assert_eq!(subscription.get(), coordinator.current());
}

#[tokio::test]
async fn test_reject_policy_refuses_overlapping_reorder() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(ScriptedStore::gated(gate.clone()));
    let sink = Arc::new(RecordingSink::default());
    let coordinator = coordinator(&store, &sink).with_policy(ConcurrencyPolicy::Reject);

    let second = async {
        wait_for_pending(&coordinator).await;
        let result = coordinator.reorder_with_commit(&"A".into(), 2).await;
        gate.notify_one();
        result
    };

    let c_id = "C".into();
    let (first, second) = tokio::join!(coordinator.reorder_with_commit(&c_id, 0), second);

    first.unwrap();
    assert!(matches!(second, Err(BoardError::ReorderInFlight)));
    assert_eq!(ids(&coordinator.current()), vec!["C", "A", "B"]);
    assert_eq!(store.call_count(), 1);
}

#[tokio::test]
async fn test_queue_policy_applies_reorders_in_sequence() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(ScriptedStore::gated(gate.clone()));
    let sink = Arc::new(RecordingSink::default());
    let settings = ReorderSettings::default().with_concurrency(ConcurrencyPolicy::Queue);
    let coordinator = coordinator(&store, &sink).with_settings(&settings).unwrap();

    let second = async {
        wait_for_pending(&coordinator).await;
        let a_id = "A".into();
        let queued = coordinator.reorder_with_commit(&a_id, 2);
        gate.notify_one();
        queued.await
    };

    let c_id = "C".into();
    let (first, second) = tokio::join!(coordinator.reorder_with_commit(&c_id, 0), second);

    first.unwrap();
    second.unwrap();

    // The second move was computed against the committed result of the first
    let current = coordinator.current();
    assert_eq!(ids(&current), vec!["C", "B", "A"]);
    assert_eq!(current[2].position, 1200.0);
    assert_eq!(sink.successes(), 2);
}

#[tokio::test]
async fn test_phase_subscription_sees_transitions() {
    let store = Arc::new(ScriptedStore::accepting());
    let sink = Arc::new(RecordingSink::default());
    let coordinator = coordinator(&store, &sink);
    let mut phases = coordinator.subscribe_phase();

    coordinator
        .reorder_with_commit(&"B".into(), 2)
        .await
        .unwrap();

    let last = phases.changed().await.unwrap();
    assert_eq!(
        last,
        ReorderPhase::Committed {
            moved: "B".into(),
            position: 1300.0,
        }
    );
}
