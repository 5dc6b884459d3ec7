//! Strongly typed reorder settings

use crate::defaults::{
    DEFAULT_BASELINE, DEFAULT_GAP, DEFAULT_MIN_GAP, DEFAULT_PERSIST_TIMEOUT_MS,
};
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What happens when a reorder is requested while another one for the same
/// sibling set is still waiting on the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrencyPolicy {
    /// Wait for the in-flight reorder to resolve, then compute against the
    /// latest state
    #[default]
    Queue,
    /// Fail the new request immediately while another reorder is in flight
    Reject,
}

/// Tunables for the position engine and the reorder coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderSettings {
    /// Position of the first item placed in an empty container
    pub baseline: f64,
    /// Tail increment and renumbering step
    pub gap: f64,
    /// Narrowest span that may still be bisected
    pub min_gap: f64,
    /// Persist deadline in milliseconds
    pub persist_timeout_ms: u64,
    /// Policy for overlapping reorders
    pub concurrency: ConcurrencyPolicy,
}

impl Default for ReorderSettings {
    fn default() -> Self {
        Self {
            baseline: DEFAULT_BASELINE,
            gap: DEFAULT_GAP,
            min_gap: DEFAULT_MIN_GAP,
            persist_timeout_ms: DEFAULT_PERSIST_TIMEOUT_MS,
            concurrency: ConcurrencyPolicy::default(),
        }
    }
}

impl ReorderSettings {
    /// Persist deadline as a [`Duration`]
    pub fn persist_timeout(&self) -> Duration {
        Duration::from_millis(self.persist_timeout_ms)
    }

    /// Builder-style concurrency override
    pub fn with_concurrency(mut self, concurrency: ConcurrencyPolicy) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Builder-style persist deadline override
    pub fn with_persist_timeout(mut self, timeout: Duration) -> Self {
        self.persist_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Check that the values can drive the position engine
    pub fn validate(&self) -> ConfigResult<()> {
        for (key, value) in [
            ("baseline", self.baseline),
            ("gap", self.gap),
            ("min_gap", self.min_gap),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid_value(
                    key,
                    format!("must be a finite positive number, got {value}"),
                ));
            }
        }

        if self.min_gap >= self.gap {
            return Err(ConfigError::validation(format!(
                "min_gap ({}) must be smaller than gap ({})",
                self.min_gap, self.gap
            )));
        }

        if self.persist_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "persist_timeout_ms",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}
