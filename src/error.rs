// Collection and derivation errors

use thiserror::Error;

/// Failures that stop one container (or a whole pass) from being published.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The runtime is unreachable; the pass is abandoned until the next interval.
    #[error("cannot reach container runtime: {0}")]
    RuntimeConnection(#[source] bollard::errors::Error),

    #[error("container {0} not found")]
    ContainerNotFound(String),

    #[error("stats fetch failed for {name}: {reason}")]
    StatsFetch { name: String, reason: String },

    #[error("stats fetch for {name} timed out after {secs}s")]
    Timeout { name: String, secs: u64 },
}

/// A field group that could not be derived from a snapshot. Never fatal: the
/// affected metrics fall back to zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    #[error("missing field {0}")]
    MissingField(&'static str),

    #[error("cpu usage went backwards")]
    NegativeCpuDelta,

    #[error("system cpu usage did not advance")]
    NonPositiveSystemDelta,
}
