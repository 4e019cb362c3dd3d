//! `agv-core` — foundational types for the AGV fleet simulation.
//!
//! This crate is a dependency of every other `agv-*` crate. It intentionally
//! has no `agv-*` dependencies and a minimal external one (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                         |
//! |-----------|---------------------------------------------------|
//! | [`ids`]   | `AgvId`, `NodeId`                                  |
//! | [`point`] | `Point`, Euclidean distance, heading               |
//! | [`time`]  | `Tick`                                             |
//! | [`rng`]   | `Rng` — deterministic seeded generator             |
//! | [`error`] | `AgvError`, `AgvResult`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                               |
//! |---------|--------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.     |

pub mod error;
pub mod ids;
pub mod point;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{AgvError, AgvResult};
pub use ids::{AgvId, NodeId};
pub use point::Point;
pub use rng::Rng;
pub use time::Tick;
