//! The fleet: the engine's exclusive container of every `Agv`.
//!
//! `AgvId`s are assigned monotonically and never reused, even after
//! [`Fleet::remove`] — so a slot-indexed `Vec<Option<Agv>>` works cleanly:
//! `agvs[id.index()]` is `None` once removed rather than silently aliasing a
//! later spawn.

use agv_core::{AgvId, NodeId, Point};

use crate::agv::Agv;
use crate::config::AgvConfig;
use crate::error::{FleetError, FleetResult};

/// The owning container of every AGV. External callers only ever see a
/// [`crate::Agv`] through a snapshot; only the simulation engine holds a
/// `&mut Fleet`.
#[derive(Clone, Debug, Default)]
pub struct Fleet {
    agvs: Vec<Option<Agv>>,
    live_count: usize,
    /// Config template applied to AGVs spawned after the last
    /// `set_default_config` call. Existing AGVs keep whatever config they
    /// were spawned with — `updateConfig(None, ...)` only affects future
    /// spawns, per §14.
    default_config: AgvConfig,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_config(default_config: AgvConfig) -> Self {
        Self { default_config, ..Self::default() }
    }

    pub fn default_config(&self) -> AgvConfig {
        self.default_config
    }

    pub fn set_default_config(&mut self, config: AgvConfig) {
        self.default_config = config;
    }

    /// Create and insert a new AGV at `node`/`position` using the fleet's
    /// current default config, returning its id.
    pub fn spawn(&mut self, node: NodeId, position: Point) -> AgvId {
        let id = AgvId(self.agvs.len() as u32);
        self.agvs.push(Some(Agv::new(id, node, position, self.default_config)));
        self.live_count += 1;
        id
    }

    pub fn remove(&mut self, id: AgvId) -> FleetResult<Agv> {
        let slot = self
            .agvs
            .get_mut(id.index())
            .ok_or(FleetError::InvalidAgvId(id))?;
        let agv = slot.take().ok_or(FleetError::InvalidAgvId(id))?;
        self.live_count -= 1;
        Ok(agv)
    }

    pub fn get(&self, id: AgvId) -> Option<&Agv> {
        self.agvs.get(id.index())?.as_ref()
    }

    pub fn get_mut(&mut self, id: AgvId) -> Option<&mut Agv> {
        self.agvs.get_mut(id.index())?.as_mut()
    }

    pub fn contains(&self, id: AgvId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.live_count
    }

    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agv> {
        self.agvs.iter().filter_map(Option::as_ref)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agv> {
        self.agvs.iter_mut().filter_map(Option::as_mut)
    }

    pub fn ids(&self) -> impl Iterator<Item = AgvId> + '_ {
        self.iter().map(|a| a.id)
    }

    /// Remove every AGV, preserving the current default config — used by
    /// `setMap` to atomically clear the fleet before swapping the active
    /// graph.
    pub fn clear(&mut self) {
        self.agvs.clear();
        self.live_count = 0;
    }
}

/// Fluent construction of an initial [`Fleet`], mirroring the framework's
/// builder convention elsewhere (`agv-sim::builder::EngineBuilder`).
pub struct FleetBuilder {
    default_config: AgvConfig,
}

impl FleetBuilder {
    pub fn new() -> Self {
        Self { default_config: AgvConfig::default() }
    }

    pub fn default_config(mut self, config: AgvConfig) -> Self {
        self.default_config = config;
        self
    }

    pub fn build(self) -> Fleet {
        Fleet::with_default_config(self.default_config)
    }
}

impl Default for FleetBuilder {
    fn default() -> Self {
        Self::new()
    }
}
