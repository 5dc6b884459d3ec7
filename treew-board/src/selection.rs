//! Explicit selection channels
//!
//! Each kind of selection (board, list, card) has exactly one writer, the
//! [`Selection`] itself, and any number of read-only [`Subscription`]s.
//! Dropping a subscription unsubscribes it.

use crate::types::{BoardId, BoardList, Card};
use tokio::sync::watch;
use tracing::trace;

/// Read-only view on a value that changes over time
#[derive(Debug)]
pub struct Subscription<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// Latest value
    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Wait for the next change and return the new value.
    ///
    /// Returns `None` once the writer is gone.
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Whether a value was published since the last [`Subscription::changed`]
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }
}

impl<T> From<watch::Receiver<T>> for Subscription<T> {
    fn from(rx: watch::Receiver<T>) -> Self {
        Self { rx }
    }
}

/// Single-writer holder of the currently selected value
#[derive(Debug)]
pub struct Selection<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone + PartialEq> Selection<T> {
    /// Empty selection
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Select a value. Subscribers are only woken when it differs from the
    /// current one; returns whether it did.
    pub fn select(&self, value: T) -> bool {
        self.tx.send_if_modified(|current| {
            if current.as_ref() == Some(&value) {
                false
            } else {
                *current = Some(value);
                true
            }
        })
    }

    /// Clear the selection; returns whether something was selected
    pub fn clear(&self) -> bool {
        self.tx.send_if_modified(|current| current.take().is_some())
    }

    /// Currently selected value
    pub fn selected(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> Subscription<Option<T>> {
        Subscription::from(self.tx.subscribe())
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T: Clone + PartialEq> Default for Selection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The selections shared across a board view
#[derive(Debug, Default)]
pub struct BoardSelection {
    pub board: Selection<BoardId>,
    pub list: Selection<BoardList>,
    pub card: Selection<Card>,
}

impl BoardSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch boards. List and card selections belong to the previous board
    /// and are cleared when the board actually changes.
    pub fn select_board(&self, board: BoardId) -> bool {
        let changed = self.board.select(board);
        if changed {
            trace!("Board selection changed, clearing list and card");
            self.list.clear();
            self.card.clear();
        }
        changed
    }
}
