//! The read-only view of the fleet the arbiter reads against.

use agv_core::AgvId;
use agv_fleet::{Agv, Fleet};

/// A frozen copy of every AGV at the start of a tick.
///
/// The driver captures one of these before arbitrating any vehicle and reads
/// exclusively from it for the whole tick — mutations land on a fresh
/// [`agv_fleet::Fleet`] instead, per `spec.md` §5's snapshot/commit
/// simultaneous-update discipline. Cloning the records up front means
/// `arbitrate` never needs to borrow the live fleet, so the driver is free to
/// iterate AGVs in any order without aliasing a `&mut Fleet` against the
/// `&FleetSnapshot` it's arbitrating from.
#[derive(Clone, Debug, Default)]
pub struct FleetSnapshot {
    agvs: Vec<Agv>,
}

impl FleetSnapshot {
    /// Capture every AGV currently in `fleet`.
    pub fn capture(fleet: &Fleet) -> Self {
        Self { agvs: fleet.iter().cloned().collect() }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agv> {
        self.agvs.iter()
    }

    pub fn get(&self, id: AgvId) -> Option<&Agv> {
        self.agvs.iter().find(|a| a.id == id)
    }

    /// Every AGV other than `ego` — the candidate set each rule scans.
    pub fn others(&self, ego: AgvId) -> impl Iterator<Item = &Agv> {
        self.agvs.iter().filter(move |a| a.id != ego)
    }

    pub fn len(&self) -> usize {
        self.agvs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agvs.is_empty()
    }
}

impl FromIterator<Agv> for FleetSnapshot {
    fn from_iter<I: IntoIterator<Item = Agv>>(iter: I) -> Self {
        Self { agvs: iter.into_iter().collect() }
    }
}
