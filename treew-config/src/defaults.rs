//! Default values for the reorder tunables

/// Position assigned to the first item of an empty container
pub const DEFAULT_BASELINE: f64 = 1000.0;

/// Increment added after the last sibling on a tail move, and the spacing
/// used when a sibling set is renumbered
pub const DEFAULT_GAP: f64 = 1000.0;

/// Smallest span between two neighbours (or between zero and the first
/// sibling) that may still be split. Anything narrower triggers a renumber.
pub const DEFAULT_MIN_GAP: f64 = 1.0;

/// Deadline for a single persist call before the reorder is rolled back
pub const DEFAULT_PERSIST_TIMEOUT_MS: u64 = 10_000;

/// Directory name searched for configuration files, both in the home
/// directory and in the working directory
pub const CONFIG_DIR_NAME: &str = ".treew";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "TREEW_";
