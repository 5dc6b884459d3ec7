//! Shared test doubles for the remote store and the notification sink

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use treew_board::{
    ItemId, NotificationSink, OrderedItem, PositionUpdate, RemoteStore, StoreError, Toast,
    ToastLevel,
};

/// How the store answers
#[derive(Debug, Clone)]
pub enum Reply {
    /// Confirm the requested position
    Accept,
    /// Confirm, but with the server's own position
    AcceptAt(f64),
    /// Refuse the write
    Reject(String),
    /// Never answer
    Hang,
}

/// Remote store with a fixed reply, recording every call
pub struct ScriptedStore {
    reply: Reply,
    gate: Mutex<Option<Arc<Notify>>>,
    pub singles: Mutex<Vec<PositionUpdate>>,
    pub batches: Mutex<Vec<Vec<PositionUpdate>>>,
}

impl ScriptedStore {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            gate: Mutex::new(None),
            singles: Mutex::new(Vec::new()),
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting() -> Self {
        Self::new(Reply::Accept)
    }

    /// Accepting store whose first call waits until `gate` is notified
    pub fn gated(gate: Arc<Notify>) -> Self {
        let store = Self::accepting();
        *store.gate.lock().unwrap() = Some(gate);
        store
    }

    pub fn call_count(&self) -> usize {
        self.singles.lock().unwrap().len() + self.batches.lock().unwrap().len()
    }

    async fn answer(&self) -> Result<Option<f64>, StoreError> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match &self.reply {
            Reply::Accept => Ok(None),
            Reply::AcceptAt(position) => Ok(Some(*position)),
            Reply::Reject(message) => Err(StoreError::rejected(message.clone())),
            Reply::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl RemoteStore for ScriptedStore {
    async fn persist_position(&self, id: &ItemId, position: f64) -> Result<OrderedItem, StoreError> {
        self.singles.lock().unwrap().push(PositionUpdate {
            id: id.clone(),
            position,
        });
        let confirmed = self.answer().await?;
        Ok(OrderedItem::new(id.clone(), confirmed.unwrap_or(position)))
    }

    async fn persist_batch_positions(&self, updates: &[PositionUpdate]) -> Result<(), StoreError> {
        self.batches.lock().unwrap().push(updates.to_vec());
        self.answer().await.map(|_| ())
    }
}

/// Sink keeping every toast
#[derive(Default)]
pub struct RecordingSink {
    pub toasts: Mutex<Vec<Toast>>,
}

impl RecordingSink {
    pub fn count(&self, level: ToastLevel) -> usize {
        self.toasts
            .lock()
            .unwrap()
            .iter()
            .filter(|toast| toast.level == level)
            .count()
    }

    pub fn failures(&self) -> usize {
        self.count(ToastLevel::Danger)
    }

    pub fn successes(&self) -> usize {
        self.count(ToastLevel::Success)
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

pub fn abc() -> Vec<OrderedItem> {
    vec![
        OrderedItem::new("A", 100.0),
        OrderedItem::new("B", 200.0),
        OrderedItem::new("C", 300.0),
    ]
}

pub fn ids(items: &[OrderedItem]) -> Vec<String> {
    items.iter().map(|item| item.id.to_string()).collect()
}
