//! Remote store seam
//!
//! Whatever client talks to the board API implements [`RemoteStore`]. The
//! coordinator only ever sees the authoritative item it returns, or an error.

use crate::types::{ItemId, OrderedItem, PositionUpdate};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a remote store
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The service answered and refused the update
    #[error("remote store rejected update: {message}")]
    Rejected { message: String },

    /// The service could not be reached
    #[error("remote store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    /// Create a rejection error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Persistence capability for item positions
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Persist one item's position and return the server's view of the item.
    ///
    /// The returned position is authoritative and may differ from the
    /// requested one.
    async fn persist_position(
        &self,
        id: &ItemId,
        position: f64,
    ) -> Result<OrderedItem, StoreError>;

    /// Persist several positions at once, as after a renumber.
    ///
    /// Treated as all-or-nothing: any error rolls back every item.
    async fn persist_batch_positions(&self, updates: &[PositionUpdate]) -> Result<(), StoreError>;
}
