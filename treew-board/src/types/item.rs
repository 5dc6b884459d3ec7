//! Reorderable items and the snapshots taken of them

use super::ids::ItemId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// An entity taking part in a reorderable sibling sequence.
///
/// Siblings are ordered ascending by `position`; equal positions fall back to
/// the identifier so the order is always deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedItem {
    pub id: ItemId,
    #[serde(alias = "pos")]
    pub position: f64,
}

impl OrderedItem {
    /// Create a new item
    pub fn new(id: impl Into<ItemId>, position: f64) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }

    /// Sibling ordering: position first, identifier second
    pub fn sibling_cmp(&self, other: &Self) -> Ordering {
        self.position
            .total_cmp(&other.position)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Sort a sibling sequence into display order
pub fn sort_siblings(items: &mut [OrderedItem]) {
    items.sort_by(OrderedItem::sibling_cmp);
}

/// A single position write destined for the remote store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: ItemId,
    pub position: f64,
}

impl From<&OrderedItem> for PositionUpdate {
    fn from(item: &OrderedItem) -> Self {
        Self {
            id: item.id.clone(),
            position: item.position,
        }
    }
}

/// Immutable copy of a sibling sequence kept as a rollback target
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Snapshot {
    items: Vec<OrderedItem>,
}

impl Snapshot {
    /// Capture a copy of the given sequence
    pub fn capture(items: &[OrderedItem]) -> Self {
        Self {
            items: items.to_vec(),
        }
    }

    /// The captured items, in captured order
    pub fn items(&self) -> &[OrderedItem] {
        &self.items
    }

    /// Take the captured items back
    pub fn into_items(self) -> Vec<OrderedItem> {
        self.items
    }

    /// Number of captured items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was captured
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
