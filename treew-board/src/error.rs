//! Error types for the ordering engine

use crate::store::StoreError;
use thiserror::Error;
use treew_config::ConfigError;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur while reordering
#[derive(Debug, Error)]
pub enum BoardError {
    /// The moving item is not part of the sibling set
    #[error("item not found in sibling set: {id}")]
    ItemNotFound { id: String },

    /// Two siblings share an identifier
    #[error("duplicate item ID in sibling set: {id}")]
    DuplicateId { id: String },

    /// A sibling carries a position that cannot be ordered
    #[error("invalid position for item {id}: {position}")]
    InvalidPosition { id: String, position: f64 },

    /// The remote store rejected the write; local state was rolled back
    #[error("failed to persist position of {id}: {source}")]
    PersistenceFailed {
        id: String,
        #[source]
        source: StoreError,
    },

    /// The remote store did not answer in time; local state was rolled back
    #[error("persisting position of {id} timed out after {elapsed_ms}ms")]
    PersistTimeout { id: String, elapsed_ms: u64 },

    /// Another reorder of the same sibling set is still in flight
    #[error("reorder already in flight for this sibling set")]
    ReorderInFlight,

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl BoardError {
    /// Create an item-not-found error
    pub fn item_not_found(id: impl Into<String>) -> Self {
        Self::ItemNotFound { id: id.into() }
    }

    /// Create a duplicate ID error
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Create a persistence error
    pub fn persistence(id: impl Into<String>, source: StoreError) -> Self {
        Self::PersistenceFailed {
            id: id.into(),
            source,
        }
    }

    /// Whether the caller is violating the engine's input contract
    pub fn is_invalid_target(&self) -> bool {
        matches!(
            self,
            Self::ItemNotFound { .. } | Self::DuplicateId { .. } | Self::InvalidPosition { .. }
        )
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ReorderInFlight | Self::PersistTimeout { .. })
    }
}
