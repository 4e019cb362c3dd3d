//! Fleet-subsystem error type.

use thiserror::Error;

use agv_core::AgvId;

/// Errors produced by `agv-fleet`.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("agv {0} not found")]
    InvalidAgvId(AgvId),

    #[error("cannot spawn an agv onto an empty map")]
    EmptyMap,
}

pub type FleetResult<T> = Result<T, FleetError>;
