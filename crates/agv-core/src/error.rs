//! Shared error type for `agv-core` itself.
//!
//! Per-crate errors (`agv-map::MapError`, `agv-fleet::FleetError`,
//! `agv-sim::SimError`) live in their own crates and do not funnel through
//! here — `AgvError` only covers failures that can occur in `agv-core`'s own
//! types (currently just config-value validation).

use thiserror::Error;

/// Errors produced by `agv-core`'s own operations.
#[derive(Debug, Error)]
pub enum AgvError {
    /// A configuration key was recognized but the value violates its
    /// documented constraint (e.g. a negative `max_speed`).
    #[error("invalid value {value} for config key {key}: {reason}")]
    InvalidConfigValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Shorthand result type for `agv-core`.
pub type AgvResult<T> = Result<T, AgvError>;
