//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter. Unlike a wall-clock
//! simulation there is no `SimClock`/`SimConfig` mapping to real seconds here:
//! per §5, `Engine::tick()` is cadence-agnostic — callers (an animation frame
//! callback, a CLI loop, a test harness) advance it at whatever rate they
//! like. `RETRY_INTERVAL` (§4.6) is calibrated assuming roughly 60 ticks per
//! second, but nothing in the core enforces that mapping.

use std::fmt;

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Advance by one tick, returning the new value.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
