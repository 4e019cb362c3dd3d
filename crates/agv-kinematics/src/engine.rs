//! The per-tick speed-and-progress step (`spec.md` §4.5).

use agv_fleet::{Agv, AgvStatus};
use agv_map::Graph;

/// Below this remaining distance (with speed also below 0.5 px/tick), force
/// immediate arrival rather than let the AGV creep toward `progress == 1`
/// for several more ticks.
const SNAP_TO_ARRIVAL_DISTANCE: f64 = 10.0;
const SNAP_TO_ARRIVAL_SPEED: f64 = 0.5;

/// Safety margin added to the computed braking distance before the AGV
/// starts decelerating for a final-edge stop.
const BRAKING_MARGIN: f64 = 5.0;

/// Advance `agv` by one tick of kinematics.
///
/// `accelerate` is the arbiter's verdict collapsed to a boolean: `true` for
/// `MOVE` (converge toward `maxSpeed`, subject to braking-distance arrival on
/// the final edge), `false` for `WAIT` (converge toward `0`, i.e. decelerate
/// to a stop without abandoning the current edge). Both branches then share
/// identical progress/position/orientation update and arrival-commit logic,
/// so a WAITING AGV that coasts to a stop mid-edge still advances smoothly
/// rather than freezing instantly.
///
/// No-op if `agv.path` is empty (already arrived / never dispatched) or if
/// the edge to `agv.path[0]` is not in `graph` — both degrade silently per
/// `spec.md` §7.
pub fn advance(agv: &mut Agv, graph: &Graph, accelerate: bool) {
    let Some(next) = agv.next_node() else { return };
    let Some(edge_distance) = graph.edge_distance(agv.current_node, next) else { return };

    let on_final_edge = agv.path.len() == 1;
    let remaining = edge_distance - agv.progress_distance;

    let target_speed = if !accelerate {
        0.0
    } else if on_final_edge {
        let braking_distance = agv.current_speed * agv.current_speed / (2.0 * agv.config.deceleration);
        if remaining <= braking_distance + BRAKING_MARGIN { 0.0 } else { agv.config.max_speed }
    } else {
        agv.config.max_speed
    };

    agv.current_speed = step_speed(agv.current_speed, target_speed, agv.config.acceleration, agv.config.deceleration);

    agv.progress_distance += agv.current_speed;
    agv.progress = if edge_distance > 0.0 { (agv.progress_distance / edge_distance).clamp(0.0, 1.0) } else { 1.0 };

    if on_final_edge {
        let remaining_after = edge_distance - agv.progress_distance;
        if remaining_after < SNAP_TO_ARRIVAL_DISTANCE && agv.current_speed < SNAP_TO_ARRIVAL_SPEED {
            agv.progress = 1.0;
        }
    }

    let from = graph.position(agv.current_node);
    let to = graph.position(next);
    if let (Some(from), Some(to)) = (from, to) {
        let heading = from.heading_to(to);
        agv.orientation = heading.to_degrees();
        let pos = from.advance(heading, edge_distance * agv.progress);
        agv.x = pos.x;
        agv.y = pos.y;
    }

    if agv.progress >= 1.0 {
        commit_arrival(agv, graph);
    }
}

fn step_speed(current: f64, target: f64, acceleration: f64, deceleration: f64) -> f64 {
    if target > current {
        (current + acceleration).min(target)
    } else {
        (current - deceleration).max(target)
    }
}

fn commit_arrival(agv: &mut Agv, graph: &Graph) {
    let Some(arrived) = agv.path.pop_front() else { return };
    agv.previous_node = Some(agv.current_node);
    agv.current_node = arrived;
    if let Some(pos) = graph.position(arrived) {
        agv.x = pos.x;
        agv.y = pos.y;
    }

    if agv.path.is_empty() {
        agv.status = AgvStatus::Completed;
        agv.target_node = None;
        agv.current_speed = 0.0;
    } else {
        agv.status = AgvStatus::Moving;
    }
    agv.progress = 0.0;
    agv.progress_distance = 0.0;
    agv.refresh_reservations();
}
