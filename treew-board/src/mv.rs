//! MoveItem command

use crate::coordinator::{ReorderCoordinator, ReorderOutcome};
use crate::error::Result;
use crate::types::ItemId;
use serde::Deserialize;

/// Destination of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveTarget {
    /// Before every sibling
    Head,
    /// After every sibling
    Tail,
    /// Zero-based index among the remaining siblings (drag-and-drop)
    Index(usize),
    /// One-based "move to position N", as offered by the order dialog
    Order(usize),
}

impl MoveTarget {
    /// Zero-based target index; out-of-range values are clamped later
    pub fn index(self) -> usize {
        match self {
            Self::Head => 0,
            Self::Tail => usize::MAX,
            Self::Index(index) => index,
            Self::Order(order) => order.saturating_sub(1),
        }
    }
}

/// Move a list or card to a new position among its siblings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoveItem {
    /// The item to move
    pub id: ItemId,
    /// Where it should end up
    pub target: MoveTarget,
}

impl MoveItem {
    /// Create a new MoveItem command
    pub fn new(id: impl Into<ItemId>, target: MoveTarget) -> Self {
        Self {
            id: id.into(),
            target,
        }
    }

    /// Move to the front
    pub fn to_head(id: impl Into<ItemId>) -> Self {
        Self::new(id, MoveTarget::Head)
    }

    /// Move to the end
    pub fn to_tail(id: impl Into<ItemId>) -> Self {
        Self::new(id, MoveTarget::Tail)
    }

    /// Drop at a zero-based index
    pub fn to_index(id: impl Into<ItemId>, index: usize) -> Self {
        Self::new(id, MoveTarget::Index(index))
    }

    /// Move to a one-based position
    pub fn to_order(id: impl Into<ItemId>, order: usize) -> Self {
        Self::new(id, MoveTarget::Order(order))
    }

    pub async fn execute(&self, coordinator: &ReorderCoordinator) -> Result<ReorderOutcome> {
        coordinator
            .reorder_with_commit(&self.id, self.target.index())
            .await
    }
}
