//! Core types for the ordering engine

mod entities;
mod ids;
mod item;

// Re-export all types
pub use entities::{Badges, BoardList, Card, Label, Member};
pub use ids::{BoardId, ItemId};
pub use item::{sort_siblings, OrderedItem, PositionUpdate, Snapshot};
