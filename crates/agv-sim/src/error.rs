//! Engine-level error type: composes the errors of the crates it drives.

use agv_core::AgvError;
use agv_fleet::FleetError;
use agv_map::MapError;
use thiserror::Error;

/// Errors returned by the Core API (`Engine::spawn`, `set_target`,
/// `remove_agv`, `update_config`, `set_map`).
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Config(#[from] AgvError),
}

pub type SimResult<T> = Result<T, SimError>;
