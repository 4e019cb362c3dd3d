//! `agv-recovery` — the deadlock-recovery ladder: timed retry, ranked
//! detour, and step-back reversal.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                        |
//! |-----------------|------------------------------------------------------------------|
//! | [`construction`]| `reverse_on_edge` — the shared turn-on-edge direction reversal   |
//! | [`wait`]        | `on_wait` — timer bookkeeping and the retry/detour/step-back ladder |
//! | [`head_on`]     | `on_repath_head_on` — immediate avoidance replan for rule R1     |
//!
//! Every entry point here takes `&mut Agv` directly rather than returning a
//! new record: the simulation driver has already resolved which AGV record
//! to mutate (via `Fleet::get_mut`) by the time a verdict is known, and this
//! crate has nothing useful to say about the rest of the fleet beyond the
//! single `blocker_status` value the driver already read from its snapshot.
//! Like `agv-traffic`, there is no trait here — the recovery ladder is a
//! fixed procedure, not a pluggable strategy (`spec.md` §9).
//!
//! All operations here are infallible on well-formed state: a missing graph
//! lookup (a stale or malformed node id) degrades to a no-op for that AGV
//! this tick rather than propagating an error, per `spec.md` §7.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Propagates serde derives through `agv-fleet`.                |

pub mod construction;
pub mod head_on;
pub mod wait;


pub use head_on::on_repath_head_on;
pub use wait::{on_wait, MAX_RETRIES_PER_RANK, RETRY_INTERVAL};
