//! `agv-kinematics` — bounded-acceleration speed control and edge-progress
//! advance, with braking-distance arrival and snap-to-arrival (`spec.md`
//! §4.5).
//!
//! # Crate layout
//!
//! | Module     | Contents                                                    |
//! |------------|--------------------------------------------------------------|
//! | [`engine`] | `advance` — the single per-tick speed-and-progress step       |
//!
//! Unlike the teacher's `dt-mobility`, an AGV never teleports between nodes
//! at the moment an edge's travel time elapses: every tick nudges `progress`
//! forward by a speed that itself converges toward a target under bounded
//! acceleration. There is no router here, no route cache, and no wake
//! queue — `agv-map::find_path` already produced the `path`; this crate only
//! walks it.
//!
//! `advance` is infallible: a malformed or already-arrived AGV (empty path)
//! is a no-op, per `spec.md` §7.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Propagates serde derives through `agv-fleet`.                |

pub mod engine;


pub use engine::advance;
