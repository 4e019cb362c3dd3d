//! The `Engine`: owns the graph and fleet, and drives the per-tick pipeline.

use std::collections::{HashSet, VecDeque};

use agv_core::{AgvId, NodeId, Rng, Tick};
use agv_fleet::{Agv, AgvConfig, AgvStatus, Fleet, FleetError, WaitReason};
use agv_map::{find_path, Graph, MapData, MapError};
use agv_recovery::{on_repath_head_on, on_wait};
use agv_traffic::{arbitrate, Action, FleetSnapshot};

use crate::config::{self, ConfigKey};
use crate::error::{SimError, SimResult};
use crate::observer::SimObserver;

/// Auto-pilot's per-tick, per-idle-AGV retarget probability (`spec.md` §4.7).
const AUTO_PILOT_PROBABILITY: f64 = 0.05;

/// Auto-pilot only considers AGVs whose `current_speed` has settled below this.
const AUTO_PILOT_SPEED_THRESHOLD: f64 = 0.1;

/// A read-only view of the fleet plus the tick it was captured at, returned
/// by [`Engine::snapshot`] (`spec.md` §6: `engine.snapshot() -> { agvs, now }`).
#[derive(Clone, Debug)]
pub struct EngineSnapshot {
    pub agvs: Vec<Agv>,
    pub now: Tick,
}

/// The simulation engine: the warehouse-floor `Graph`, the `Fleet` it
/// exclusively owns, the engine-wide PRNG, and the current tick.
///
/// Create via [`crate::EngineBuilder`]. Every mutating method here is the one
/// place external collaborators reach the fleet — per `spec.md` §9, nothing
/// outside this crate ever holds a `&mut Fleet`.
pub struct Engine {
    graph: Graph,
    fleet: Fleet,
    rng: Rng,
    now: Tick,
    auto_pilot: bool,
}

impl Engine {
    pub fn new(graph: Graph, fleet: Fleet, rng: Rng, auto_pilot: bool) -> Self {
        Self { graph, fleet, rng, now: Tick::ZERO, auto_pilot }
    }

    // ── Read-only accessors ────────────────────────────────────────────────

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// A read-only copy of every AGV plus the current tick.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot { agvs: self.fleet.iter().cloned().collect(), now: self.now }
    }

    // ── Core API ────────────────────────────────────────────────────────────

    /// Place a new AGV at a node at least `2 * safety_distance` from every
    /// existing AGV; falls back to a uniform random node if none qualifies.
    /// Fails with [`FleetError::EmptyMap`] if the active graph has no nodes.
    pub fn spawn(&mut self) -> SimResult<AgvId> {
        if self.graph.is_empty() {
            return Err(FleetError::EmptyMap.into());
        }

        let min_distance = 2.0 * self.fleet.default_config().safety_distance;
        let all_nodes: Vec<NodeId> = self.graph.nodes().map(|n| n.id).collect();
        let far_enough: Vec<NodeId> = all_nodes
            .iter()
            .copied()
            .filter(|&n| {
                let Some(pos) = self.graph.position(n) else { return false };
                self.fleet.iter().all(|agv| agv.position().distance(pos) >= min_distance)
            })
            .collect();

        let pool = if far_enough.is_empty() { &all_nodes } else { &far_enough };
        let node = pool[self.rng.gen_range(pool.len())];
        let position = self.graph.position(node).expect("node came from the graph");
        Ok(self.fleet.spawn(node, position))
    }

    /// Plan and assign a new target, implicitly cancelling any in-progress
    /// navigation.
    ///
    /// If `agv_id` is mid-edge (`progress > 0`), planning starts from
    /// `path[0]` (the far node of the current edge) and the returned path is
    /// prefixed with that node so the vehicle finishes its current edge
    /// first (`spec.md` §4.8). An unreachable `node_id` leaves the AGV
    /// `IDLE` with an empty path and `wait_reason = NoPath`, and this
    /// returns `Err` — diagnostic, not fatal, per `spec.md` §7.
    pub fn set_target(&mut self, agv_id: AgvId, node_id: NodeId) -> SimResult<()> {
        let now = self.now;
        let agv = self.fleet.get_mut(agv_id).ok_or(FleetError::InvalidAgvId(agv_id))?;

        let mid_edge = agv.progress > 0.0 && agv.next_node().is_some();
        let plan_from = if mid_edge { agv.next_node().unwrap() } else { agv.current_node };

        let replanned = find_path(&self.graph, plan_from, node_id, &HashSet::new(), &HashSet::new());
        agv.path_planning_time = now;

        if replanned.is_empty() && plan_from != node_id {
            agv.path = VecDeque::new();
            agv.target_node = None;
            agv.status = AgvStatus::Idle;
            agv.wait_reason = Some(WaitReason::NoPath);
            agv.refresh_reservations();
            return Err(MapError::NoPath { from: plan_from, to: node_id }.into());
        }

        let mut path = VecDeque::with_capacity(replanned.len() + 1);
        if mid_edge {
            path.push_back(plan_from);
        }
        path.extend(replanned);

        agv.target_node = Some(node_id);
        agv.wait_reason = None;
        if path.is_empty() {
            // Already at node_id and not mid-edge: nothing to navigate.
            agv.status = AgvStatus::Completed;
        } else {
            agv.status = AgvStatus::Moving;
        }
        agv.path = path;
        agv.refresh_reservations();
        Ok(())
    }

    pub fn remove_agv(&mut self, agv_id: AgvId) -> SimResult<()> {
        self.fleet.remove(agv_id)?;
        Ok(())
    }

    /// Update one tunable, either for a single AGV (`Some(id)`) or the
    /// fleet-wide default applied to future spawns (`None`). Validates the
    /// value before committing (`spec.md` §7's `InvalidConfigValue`).
    pub fn update_config(&mut self, agv_id: Option<AgvId>, key: ConfigKey, value: f64) -> SimResult<()> {
        match agv_id {
            Some(id) => {
                let agv = self.fleet.get_mut(id).ok_or(FleetError::InvalidAgvId(id))?;
                config::apply(&mut agv.config, key, value)?;
            }
            None => {
                let mut default_config = self.fleet.default_config();
                config::apply(&mut default_config, key, value)?;
                self.fleet.set_default_config(default_config);
            }
        }
        Ok(())
    }

    pub fn set_auto_pilot(&mut self, enabled: bool) {
        self.auto_pilot = enabled;
    }

    /// Atomically clear the fleet and swap the active graph.
    pub fn set_map(&mut self, map: &MapData) {
        self.fleet.clear();
        self.graph = Graph::from_map_data(map);
    }

    // ── Tick loop ────────────────────────────────────────────────────────────

    /// Advance the simulation by one tick: arbitrate every AGV against a
    /// frozen start-of-tick snapshot, dispatch the verdict to recovery and
    /// kinematics, then run the auto-pilot pass (`spec.md` §4.7, §5).
    pub fn tick(&mut self) {
        let snapshot = FleetSnapshot::capture(&self.fleet);
        let ids: Vec<AgvId> = self.fleet.ids().collect();
        for id in ids {
            self.tick_one(id, &snapshot);
        }
        self.run_auto_pilot();
        self.now = self.now.next();
    }

    /// Run `ticks` steps, invoking observer hooks at each boundary.
    pub fn run<O: SimObserver>(&mut self, ticks: u64, observer: &mut O) {
        for _ in 0..ticks {
            observer.on_tick_start(self.now);
            self.tick();
            observer.on_tick_end(self.now);
        }
        observer.on_sim_end(self.now);
    }

    fn tick_one(&mut self, id: AgvId, snapshot: &FleetSnapshot) {
        let Some(agv) = self.fleet.get(id) else { return };
        if agv.status.is_idle_or_completed() {
            return;
        }
        let Some(next) = agv.next_node() else { return };
        let Some(ego_pos) = self.graph.position(agv.current_node) else { return };
        let Some(next_pos) = self.graph.position(next) else { return };

        let verdict = arbitrate(agv, snapshot, ego_pos, next_pos);
        let blocker_status = verdict.blocker.and_then(|b| snapshot.get(b)).map(|a| a.status);

        let Some(agv) = self.fleet.get_mut(id) else { return };
        match verdict.action {
            Action::Move => {
                if matches!(agv.status, AgvStatus::Waiting | AgvStatus::Detour | AgvStatus::Repathing) {
                    agv.status = AgvStatus::Moving;
                    agv.wait_reason = None;
                }
                agv_kinematics::advance(agv, &self.graph, true);
            }
            Action::Wait => {
                let reason = verdict.reason.expect("Wait verdict always carries a reason");
                on_wait(agv, &self.graph, blocker_status, reason);
                agv_kinematics::advance(agv, &self.graph, false);
            }
            Action::RepathHeadOn => {
                let avoid = verdict.avoid.expect("RepathHeadOn verdict always carries an edge");
                on_repath_head_on(agv, &self.graph, avoid);
                let accelerate = agv.status != AgvStatus::Waiting;
                agv_kinematics::advance(agv, &self.graph, accelerate);
            }
        }
    }

    /// Bernoulli(0.05) per idle/completed, settled AGV: draw a fresh random
    /// target excluding its current node and any node already claimed as
    /// another AGV's target (`spec.md` §4.7).
    fn run_auto_pilot(&mut self) {
        if !self.auto_pilot {
            return;
        }

        let mut claimed_targets: HashSet<NodeId> = self.fleet.iter().filter_map(|a| a.target_node).collect();
        let candidates: Vec<AgvId> = self
            .fleet
            .iter()
            .filter(|a| a.status.is_idle_or_completed() && a.current_speed < AUTO_PILOT_SPEED_THRESHOLD)
            .map(|a| a.id)
            .collect();

        for id in candidates {
            if !self.rng.gen_bool(AUTO_PILOT_PROBABILITY) {
                continue;
            }
            let Some(agv) = self.fleet.get(id) else { continue };
            let current = agv.current_node;

            let eligible: Vec<NodeId> = self
                .graph
                .nodes()
                .map(|n| n.id)
                .filter(|&n| n != current && !claimed_targets.contains(&n))
                .collect();
            if eligible.is_empty() {
                continue;
            }
            let target = eligible[self.rng.gen_range(eligible.len())];
            if self.set_target(id, target).is_ok() {
                claimed_targets.insert(target);
            }
        }
    }
}

/// Default fleet-wide config applied to AGVs spawned before any
/// `update_config(None, ...)` call — re-exported for callers assembling an
/// `Engine` outside [`crate::EngineBuilder`].
pub fn default_agv_config() -> AgvConfig {
    AgvConfig::default()
}
