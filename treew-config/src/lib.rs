//! Treew configuration management using Figment
//!
//! Tunables for the fractional position engine and the reorder coordinator.
//!
//! # Precedence
//!
//! defaults → `~/.treew/treew.*` → `./.treew/treew.*` → `TREEW_*` environment
//!
//! # Example
//!
//! ```toml
//! baseline = 1000.0
//! gap = 1000.0
//! min_gap = 1.0
//! persist_timeout_ms = 5000
//! concurrency = "reject"
//! ```
//!
//! ```no_run
//! use treew_config::load_settings;
//!
//! let settings = load_settings()?;
//! println!("gap = {}", settings.gap);
//! # Ok::<(), treew_config::ConfigError>(())
//! ```

pub mod defaults;
pub mod discovery;
mod error;
mod provider;
mod types;

#[cfg(test)]
mod tests;

pub use discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery};
pub use error::ConfigError;
pub use provider::{load_settings, ConfigProvider};
pub use types::{ConcurrencyPolicy, ReorderSettings};

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
