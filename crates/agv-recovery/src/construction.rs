//! The turn-on-edge construction shared by head-on repathing, ranked
//! detour, and step-back (`spec.md` §4.6, GLOSSARY).
//!
//! An AGV partway down an edge cannot simply be handed a new `path` starting
//! from `current_node` — it is physically somewhere between `current_node`
//! and `path[0]`, and snapping it to either endpoint would violate the
//! no-teleportation property (`spec.md` §8, property 4). Instead the edge's
//! identity is flipped: `current_node` becomes the old `path[0]` (the "far
//! end"), and `progress` is inverted. Kinematics always advances `progress`
//! forward along whatever edge `(current_node, path[0])` currently names, so
//! after the flip the AGV continues moving — smoothly, with no jump in `x,
//! y` — but now retracing back toward where it started.

use agv_core::NodeId;
use agv_fleet::Agv;
use agv_map::Graph;

/// Below this, an AGV counts as "at a node" rather than mid-edge — mirrors
/// `agv_traffic::arbiter`'s `AT_NODE_PROGRESS` constant (duplicated rather
/// than imported: `agv-recovery` does not depend on `agv-traffic`, and the
/// two crates' thresholds are independent per `spec.md`, coincidentally
/// sharing a value).
pub const AT_NODE_PROGRESS: f64 = 0.05;

/// Reverse `agv` on the edge it is currently mid-traversal of: swap
/// `current_node` for `path[0]` and invert `progress`/`progress_distance`.
///
/// Returns the *original* `current_node` — the node the caller should
/// prepend to whatever replanned route follows, so the AGV finishes
/// retracing this edge before joining the detour (`spec.md` §4.6's "prepend
/// the original currentNode to the replanned path").
///
/// Requires `agv.next_node()` to be `Some`; callers only reach for this when
/// mid-edge (`progress > AT_NODE_PROGRESS` or the step-back `0.1` variant),
/// which implies a non-empty path.
pub fn reverse_on_edge(agv: &mut Agv, graph: &Graph) -> NodeId {
    let far_end = agv.next_node().expect("reverse_on_edge requires a non-empty path");
    let original_current = agv.current_node;

    agv.current_node = far_end;
    agv.progress = 1.0 - agv.progress;
    let edge_distance = graph.edge_distance(original_current, far_end).unwrap_or(0.0);
    agv.progress_distance = edge_distance * agv.progress;

    original_current
}
