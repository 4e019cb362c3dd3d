//! `agv-sim` — the engine: composes the arbiter, the recovery ladder, and
//! kinematics into one per-tick driver, and exposes the Core API.
//!
//! # Per-tick pipeline (`spec.md` §5)
//!
//! ```text
//! for each tick:
//!   ① Snapshot  — FleetSnapshot::capture(&fleet), a frozen start-of-tick view.
//!   ② Arbitrate — every AGV with a non-empty path gets a Verdict from the
//!                 snapshot (R0–R5, first match wins).
//!   ③ Apply     — Move -> agv_kinematics::advance; Wait -> agv_recovery::on_wait;
//!                 RepathHeadOn -> agv_recovery::on_repath_head_on; each
//!                 followed by a kinematics pass.
//!   ④ Auto-pilot — Bernoulli(0.05) retarget for settled idle/completed AGVs.
//! ```
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|---------------------------------------------------------------|
//! | [`engine`]  | `Engine`, `EngineSnapshot` — the driver and the Core API       |
//! | [`builder`] | `EngineBuilder` — fluent construction                          |
//! | [`config`]  | `ConfigKey` — `update_config`'s validated tunables              |
//! | [`observer`]| `SimObserver`, `NoopObserver` — tick-loop callbacks             |
//! | [`error`]   | `SimError`, `SimResult<T>`                                      |
//!
//! # Cargo features
//!
//! | Feature | Effect                                                         |
//! |---------|------------------------------------------------------------------|
//! | `serde` | Propagates `Serialize`/`Deserialize` through every crate below.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use agv_sim::{EngineBuilder, NoopObserver};
//!
//! let mut engine = EngineBuilder::new("warehouse-1").generate_map(40).build();
//! let a = engine.spawn()?;
//! engine.set_target(a, agv_core::NodeId(7))?;
//! engine.run(600, &mut NoopObserver);
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod observer;

#[cfg(test)]
mod tests;

pub use builder::EngineBuilder;
pub use config::ConfigKey;
pub use engine::{Engine, EngineSnapshot};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
