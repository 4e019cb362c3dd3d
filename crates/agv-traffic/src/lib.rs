//! `agv-traffic` — the traffic arbiter: a pure function from an AGV and a
//! read-only view of its peers to a single verdict.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|----------------------------------------------------------- |
//! | [`snapshot`] | `FleetSnapshot` — a frozen, clonable view of the fleet      |
//! | [`verdict`]  | `Action`, `Verdict` — the arbiter's output                  |
//! | [`arbiter`]  | `arbitrate()` and rules R0–R5                                |
//!
//! There is no error type here and no trait to implement against. The
//! framework this crate descends from centers this kind of per-agent
//! decision on a `BehaviorModel` trait so that callers can swap in different
//! strategies at runtime; the arbiter this crate models has exactly one
//! behavior, fixed by the rule table, with nothing to abstract over — so it
//! is a plain function instead of a trait object (`spec.md` §9: "the arbiter
//! is a pure function; there is no dynamic dispatch to abstract away").
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|---------------------------------------------------------------|
//! | `serde` | Propagates `Serialize`/`Deserialize` to `Verdict`/`Action`.    |

pub mod arbiter;
pub mod snapshot;
pub mod verdict;


pub use arbiter::arbitrate;
pub use snapshot::FleetSnapshot;
pub use verdict::{Action, Verdict};
