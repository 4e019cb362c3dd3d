//! Immediate replan in response to rule R1 (`spec.md` §4.4, §4.6).

use std::collections::{HashSet, VecDeque};

use agv_core::NodeId;
use agv_fleet::{Agv, AgvStatus};
use agv_map::{find_path, Graph};

use crate::construction::{reverse_on_edge, AT_NODE_PROGRESS};

/// Handle a `REPATH_HEAD_ON` verdict: replan immediately, avoiding the
/// offending edge.
///
/// If `agv` is essentially at a node (`progress < AT_NODE_PROGRESS`), the
/// path is simply replaced. Otherwise the AGV is partway down the offending
/// edge and must finish crossing it backwards via the turn-on-edge
/// construction before following the detour (`spec.md` §4.6). Resets
/// `path_rank` to `0` per `SPEC_FULL.md` §12's Open Question resolution #3 —
/// the detour ladder restarts once the offending edge is known and avoided.
///
/// If no alternative path exists avoiding the edge, the AGV is left
/// `WAITING` rather than stuck in an inconsistent half-replanned state —
/// `spec.md` §7 treats this as diagnostic, not fatal.
pub fn on_repath_head_on(agv: &mut Agv, graph: &Graph, avoid_edge: (NodeId, NodeId)) {
    let Some(target) = agv.target_node else { return };

    let mut avoid_edges = HashSet::new();
    avoid_edges.insert(normalize(avoid_edge.0, avoid_edge.1));
    let replanned = find_path(graph, agv.current_node, target, &HashSet::new(), &avoid_edges);

    if replanned.is_empty() {
        agv.status = AgvStatus::Waiting;
        return;
    }

    if agv.progress < AT_NODE_PROGRESS {
        agv.path = VecDeque::from(replanned);
    } else {
        let original_current = reverse_on_edge(agv, graph);
        let mut path = VecDeque::with_capacity(replanned.len() + 1);
        path.push_back(original_current);
        path.extend(replanned);
        agv.path = path;
    }

    agv.status = AgvStatus::Repathing;
    agv.path_rank = 0;
    agv.refresh_reservations();
}

fn normalize(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a.0 <= b.0 { (a, b) } else { (b, a) }
}
