//! Fractional ordering engine for Treew boards
//!
//! Lists on a board and cards in a list are ordered by real-valued keys.
//! This crate computes new keys for reordered items and applies the reorders
//! optimistically against a remote store, rolling back when the store
//! refuses.
//!
//! ## Overview
//!
//! - **[`PositionEngine`]** - pure key computation; relocating an item writes
//!   one key, never the whole sibling set, unless the keys are exhausted and
//!   a renumber is needed
//! - **[`ReorderCoordinator`]** - owns a sibling set, publishes optimistic
//!   reorders, commits or rolls back on the store's answer
//! - **[`RemoteStore`] / [`NotificationSink`]** - seams towards the board API
//!   and the user
//! - **[`selection`]** - explicit selected board/list/card channels
//! - **[`insights`]** - card progress, priority, due state, filters and sorts
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use treew_board::{mv::MoveItem, OrderedItem, ReorderCoordinator, RemoteStore, TracingSink};
//!
//! # async fn example(store: Arc<dyn RemoteStore>) -> Result<(), Box<dyn std::error::Error>> {
//! let lists = vec![
//!     OrderedItem::new("todo", 1000.0),
//!     OrderedItem::new("doing", 2000.0),
//!     OrderedItem::new("done", 3000.0),
//! ];
//! let coordinator = ReorderCoordinator::new(lists, store, Arc::new(TracingSink))?;
//!
//! // "Move to position 1" from the order dialog
//! MoveItem::to_order("done", 1).execute(&coordinator).await?;
//! # Ok(())
//! # }
//! ```

mod coordinator;
pub mod engine;
mod error;
pub mod insights;
pub mod logging;
pub mod mv;
pub mod notify;
pub mod selection;
pub mod store;
pub mod types;

pub use coordinator::{ReorderCoordinator, ReorderOutcome, ReorderPhase};
pub use engine::{AppliedReorder, PositionEngine, Spacing};
pub use error::{BoardError, Result};
pub use notify::{NotificationSink, Toast, ToastLevel, TracingSink};
pub use store::{RemoteStore, StoreError};

// Re-export commonly used types
pub use types::{
    BoardId, BoardList, Card, ItemId, OrderedItem, PositionUpdate, Snapshot,
};

// Settings come from the config crate
pub use treew_config::{ConcurrencyPolicy, ReorderSettings};
