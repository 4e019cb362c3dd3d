//! `agv-fleet` — the AGV record and the fleet that owns all of them.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|-----------------------------------------------------------------|
//! | [`agv`]     | `Agv`, `AgvStatus`, `WaitReason`, reservation-lease helpers     |
//! | [`config`]  | `AgvConfig` and its fleet-wide defaults                         |
//! | [`fleet`]   | `Fleet` — the owning container keyed by `AgvId`, `FleetBuilder` |
//! | [`error`]   | `FleetError`, `FleetResult<T>`                                  |
//!
//! # Storage strategy
//!
//! This crate stores agents as `Vec<Agv>` (array-of-structs), not the
//! structure-of-arrays `ComponentMap` the framework this crate descends from
//! uses. An `Agv` is one tagged record with cross-field invariants — status
//! ↔ path ↔ target, progress ↔ progressDistance, reservedNodes ⊆ path prefix
//! — that are far easier to state and uphold on a single struct than across
//! parallel component vectors. The SoA design earns its complexity at agent
//! populations in the hundreds of thousands; fleets here are tens of
//! vehicles, so AoS is the right trade (see `DESIGN.md`).
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all public types.       |

pub mod agv;
pub mod config;
pub mod error;
pub mod fleet;


pub use agv::{Agv, AgvStatus, WaitReason};
pub use config::AgvConfig;
pub use error::{FleetError, FleetResult};
pub use fleet::{Fleet, FleetBuilder};
