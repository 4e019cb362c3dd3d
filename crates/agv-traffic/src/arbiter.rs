//! The rule table: `spec.md` §4.4, evaluated in strict order, first match wins.

use agv_core::point::within_forward_cone;
use agv_core::Point;
use agv_fleet::{Agv, WaitReason};

use crate::snapshot::FleetSnapshot;
use crate::verdict::Verdict;

/// Below this, an AGV counts as "at a node" rather than mid-edge — R0, R2a,
/// R2b, and the repath/step-back mid-edge test all key off it.
const AT_NODE_PROGRESS: f64 = 0.05;

/// R2b's slack: ties within this many pixels fall back to the lower `AgvId`.
const ENTRY_CONTENTION_SLACK: f64 = 5.0;

/// R3's "moving occupant" proximity threshold.
const MOVING_OCCUPANT_RADIUS: f64 = 60.0;

/// R4's "further from target" margin.
const MERGE_YIELD_MARGIN: f64 = 15.0;

/// Decide what `ego` should do this tick against the frozen `snapshot`.
///
/// `ego_node` and `next_node` are the pixel positions of `ego.current_node`
/// and `ego.path[0]` respectively — the caller (the simulation driver) looks
/// these up from the active `Graph` so this crate never needs a dependency
/// on `agv-map`. If `ego.path` is empty there is no `next_node` to arbitrate
/// over and every rule in the table is vacuously false, so callers should
/// only invoke this for AGVs with a non-empty path.
pub fn arbitrate(ego: &Agv, snapshot: &FleetSnapshot, ego_node: Point, next_node: Point) -> Verdict {
    let Some(ego_next) = ego.next_node() else {
        return Verdict::move_();
    };
    let ego_pos = ego.position();
    let ego_at_node = ego.progress < AT_NODE_PROGRESS;

    // R0 — reservation block.
    if ego_at_node {
        if let Some(other) = snapshot.others(ego.id).find(|o| o.reserves(ego_next)) {
            return Verdict::wait(WaitReason::NodeReserved(ego_next), other.id);
        }
    }

    // R1 — head-on.
    if let Some(other) = snapshot
        .others(ego.id)
        .find(|o| o.next_node() == Some(ego.current_node) && ego_next == o.current_node)
    {
        let avoid = (ego.current_node, ego_next);
        return Verdict::repath_head_on(avoid, other.id);
    }

    // R2a — stationary occupant.
    if ego_at_node {
        if let Some(other) = snapshot
            .others(ego.id)
            .find(|o| o.current_node == ego_next && o.progress < AT_NODE_PROGRESS)
        {
            return Verdict::wait(WaitReason::DestOccupied, other.id);
        }
    }

    // R2b — entry contention.
    if ego_at_node {
        if let Some(other) = snapshot.others(ego.id).find(|o| {
            o.next_node() == Some(ego_next)
                && entry_contention_yield(ego_pos, o.position(), next_node, ego.id, o.id)
        }) {
            return Verdict::wait(WaitReason::YieldEntry, other.id);
        }
    }

    // R3 — moving occupant near.
    if let Some(other) = snapshot.others(ego.id).find(|o| {
        o.current_node == ego_next && ego_node.distance(o.position()) < MOVING_OCCUPANT_RADIUS
    }) {
        return Verdict::wait(WaitReason::WaitingNode(ego_next), other.id);
    }

    // R4 — mid-edge merge.
    if !ego_at_node {
        if let Some(other) = snapshot.others(ego.id).find(|o| {
            o.next_node() == Some(ego_next)
                && ego_pos.distance(next_node) > o.position().distance(next_node) + MERGE_YIELD_MARGIN
        }) {
            return Verdict::wait(WaitReason::MergeYield, other.id);
        }
    }

    // R5 — proximity sensor.
    let heading = ego_node.heading_to(next_node);
    if let Some(other) = snapshot.others(ego.id).find(|o| {
        closing_on(ego_pos, heading, ego.current_speed, ego.config.safety_distance, o.position())
    }) {
        return Verdict::wait(WaitReason::FrontSensor, other.id);
    }

    Verdict::move_()
}

/// `true` if `other` yields entry to `ego` under R2b: `other` is strictly
/// closer to `next_node` than `ego`, or the two are tied within
/// [`ENTRY_CONTENTION_SLACK`] pixels and `other` has the lower id.
fn entry_contention_yield(
    ego_pos: Point,
    other_pos: Point,
    next_node: Point,
    ego_id: agv_core::AgvId,
    other_id: agv_core::AgvId,
) -> bool {
    let ego_dist = ego_pos.distance(next_node);
    let other_dist = other_pos.distance(next_node);
    if other_dist + ENTRY_CONTENTION_SLACK < ego_dist {
        return true;
    }
    (other_dist - ego_dist).abs() <= ENTRY_CONTENTION_SLACK && other_id < ego_id
}

/// R5's full proximity-sensor predicate: `other` is within `safety_distance`,
/// within the ±π/2 forward cone of `heading`, and one physics step of `ego`
/// (advancing `speed` along `heading`) would shrink the gap.
fn closing_on(
    ego_pos: Point,
    heading: f64,
    speed: f64,
    safety_distance: f64,
    other_pos: Point,
) -> bool {
    let current_dist = ego_pos.distance(other_pos);
    if current_dist >= safety_distance {
        return false;
    }
    let angle = ego_pos.heading_to(other_pos) - heading;
    if !within_forward_cone(angle) {
        return false;
    }
    let future_pos = ego_pos.advance(heading, speed);
    future_pos.distance(other_pos) < current_dist
}
