//! The WAIT timer and the retry/detour/step-back ladder (`spec.md` §4.6).

use std::collections::{HashSet, VecDeque};

use agv_core::NodeId;
use agv_fleet::{Agv, AgvStatus, WaitReason};
use agv_map::{find_path, Graph};

use crate::construction::{reverse_on_edge, AT_NODE_PROGRESS};

/// Ticks an AGV spends WAITING before the recovery ladder takes its first
/// step (`spec.md` §6's config defaults, calibrated for ~60 ticks/second).
pub const RETRY_INTERVAL: u64 = 60;

/// Retry budget within one `path_rank` before the ladder advances rank, and
/// (separately) the threshold at which a waiting-on-a-waiting-blocker
/// deadlock triggers a step-back instead (`spec.md` §4.6 uses the literal
/// value `3` for both).
pub const MAX_RETRIES_PER_RANK: u32 = 3;

/// Handle a `WAIT` verdict for one tick.
///
/// Always records `reason` and bumps `wait_timer`. Once `wait_timer` crosses
/// [`RETRY_INTERVAL`], hands off to the retry ladder: step-back if the
/// blocker is itself stuck, otherwise a ranked detour attempt.
///
/// `blocker_status` is the arbitration blocker's status as read from the
/// same tick's frozen snapshot — used only to decide step-back eligibility
/// (`spec.md` §4.6: "the blocker itself is WAITING or BLOCKED").
pub fn on_wait(agv: &mut Agv, graph: &Graph, blocker_status: Option<AgvStatus>, reason: WaitReason) {
    agv.status = AgvStatus::Waiting;
    agv.wait_reason = Some(reason);
    agv.wait_timer += 1;

    if agv.wait_timer <= RETRY_INTERVAL {
        return;
    }

    on_wait_expired(agv, graph, blocker_status);
}

fn on_wait_expired(agv: &mut Agv, graph: &Graph, blocker_status: Option<AgvStatus>) {
    agv.retry_count += 1;
    let at_threshold = agv.retry_count >= MAX_RETRIES_PER_RANK;

    if at_threshold && matches!(blocker_status, Some(AgvStatus::Waiting) | Some(AgvStatus::Blocked)) {
        step_back(agv, graph);
        agv.retry_count = 0;
        return;
    }

    if at_threshold {
        agv.path_rank += 1;
    }

    if ranked_detour(agv, graph) {
        agv.wait_timer = 0;
        if at_threshold {
            agv.retry_count = 0;
        }
    } else {
        // No detour exists avoiding the blocked node: remain WAITING, only
        // the timer resets (`spec.md` §4.6) — `retry_count`/`path_rank`
        // already advanced above stay put so the next expiry continues the
        // ladder from here rather than restarting it.
        agv.wait_timer = 0;
    }
}

/// Ranked detour: replan avoiding the contested next-node. Returns `true`
/// (and mutates `agv`) if a detour was found.
fn ranked_detour(agv: &mut Agv, graph: &Graph) -> bool {
    let Some(target) = agv.target_node else { return false };
    let Some(blocked) = agv.next_node() else { return false };

    let mut avoid_nodes = HashSet::new();
    avoid_nodes.insert(blocked);
    let replanned = find_path(graph, agv.current_node, target, &avoid_nodes, &HashSet::new());
    if replanned.is_empty() {
        return false;
    }

    if agv.progress < AT_NODE_PROGRESS {
        agv.path = VecDeque::from(replanned);
        agv.status = AgvStatus::Detour;
    } else {
        let original_current = reverse_on_edge(agv, graph);
        let mut path = VecDeque::with_capacity(replanned.len() + 1);
        path.push_back(original_current);
        path.extend(replanned);
        agv.path = path;
        agv.status = AgvStatus::Repathing;
    }
    agv.refresh_reservations();
    true
}

/// Step-back: reverse on the current edge if meaningfully underway,
/// otherwise retreat one hop (to `previous_node` if still adjacent, else any
/// neighbor other than the blocked next-node), then replan onward from the
/// retreat point (`spec.md` §4.6).
fn step_back(agv: &mut Agv, graph: &Graph) {
    let Some(target) = agv.target_node else { return };

    if agv.progress > 0.1 {
        let replanned = find_path(graph, agv.current_node, target, &HashSet::new(), &HashSet::new());
        let original_current = reverse_on_edge(agv, graph);
        let mut path = VecDeque::with_capacity(replanned.len() + 1);
        path.push_back(original_current);
        path.extend(replanned);
        agv.path = path;
        agv.status = AgvStatus::Repathing;
        agv.refresh_reservations();
        agv.wait_timer = 0;
        return;
    }

    let Some(retreat) = retreat_node(agv, graph) else {
        // No alternative neighbor to retreat to: stay put, timer only.
        agv.wait_timer = 0;
        return;
    };

    let replanned = find_path(graph, retreat, target, &HashSet::new(), &HashSet::new());
    let mut path = VecDeque::with_capacity(replanned.len() + 1);
    path.push_back(retreat);
    path.extend(replanned);
    agv.path = path;
    agv.status = AgvStatus::Detour;
    agv.refresh_reservations();
    agv.wait_timer = 0;
}

fn retreat_node(agv: &Agv, graph: &Graph) -> Option<NodeId> {
    if let Some(prev) = agv.previous_node {
        if graph.are_adjacent(agv.current_node, prev) {
            return Some(prev);
        }
    }
    let blocked = agv.next_node();
    graph
        .neighbors(agv.current_node)
        .iter()
        .map(|&(n, _)| n)
        .find(|&n| Some(n) != blocked)
}

#[cfg(test)]
mod tests {
    use agv_core::{AgvId, Point};
    use agv_fleet::AgvConfig;
    use agv_map::GraphBuilder;

    use super::*;

    fn corridor() -> (Graph, [NodeId; 4]) {
        // A - B - C - D, a single-lane corridor (spec.md S5).
        let mut b = GraphBuilder::new();
        let a = b.add_node(0, 0, "A");
        let node_b = b.add_node(100, 0, "B");
        let c = b.add_node(200, 0, "C");
        let d = b.add_node(300, 0, "D");
        b.add_edge(a, node_b, 100);
        b.add_edge(node_b, c, 100);
        b.add_edge(c, d, 100);
        (b.build(), [a, node_b, c, d])
    }

    fn parked_agv(node: NodeId, pos: Point) -> Agv {
        Agv::new(AgvId(0), node, pos, AgvConfig::default())
    }

    #[test]
    fn wait_timer_accumulates_below_retry_interval() {
        let (graph, [a, node_b, _c, _d]) = corridor();
        let mut agv = parked_agv(a, Point::new(0.0, 0.0));
        agv.target_node = Some(node_b);
        agv.path = VecDeque::from(vec![node_b]);

        for _ in 0..RETRY_INTERVAL {
            on_wait(&mut agv, &graph, None, WaitReason::DestOccupied);
        }
        assert_eq!(agv.status, AgvStatus::Waiting);
        assert_eq!(agv.retry_count, 0);
        assert_eq!(agv.wait_timer, RETRY_INTERVAL);
    }

    #[test]
    fn expiry_attempts_ranked_detour() {
        let (graph, [a, node_b, c, d]) = corridor();
        // Give the node a second route around B so a detour exists.
        let mut builder = GraphBuilder::new();
        let a2 = builder.add_node(0, 0, "A");
        let b2 = builder.add_node(100, 0, "B");
        let c2 = builder.add_node(200, 0, "C");
        let d2 = builder.add_node(100, -150, "D");
        builder.add_edge(a2, b2, 100);
        builder.add_edge(b2, c2, 100);
        builder.add_edge(a2, d2, 180);
        builder.add_edge(d2, c2, 180);
        let graph_with_detour = builder.build();
        let _ = (graph, a, node_b, c, d); // corridor graph unused in this case

        let mut agv = parked_agv(a2, Point::new(0.0, 0.0));
        agv.target_node = Some(c2);
        agv.path = VecDeque::from(vec![b2, c2]);

        for _ in 0..=RETRY_INTERVAL {
            on_wait(&mut agv, &graph_with_detour, None, WaitReason::DestOccupied);
        }

        assert_eq!(agv.status, AgvStatus::Detour);
        assert_eq!(agv.path.front(), Some(&d2));
        assert_eq!(agv.wait_timer, 0);
    }

    #[test]
    fn no_detour_available_resets_timer_only() {
        let (graph, [a, node_b, _c, _d]) = corridor();
        let mut agv = parked_agv(a, Point::new(0.0, 0.0));
        agv.target_node = Some(node_b);
        agv.path = VecDeque::from(vec![node_b]);

        for _ in 0..=RETRY_INTERVAL {
            on_wait(&mut agv, &graph, None, WaitReason::DestOccupied);
        }
        assert_eq!(agv.status, AgvStatus::Waiting);
        assert_eq!(agv.wait_timer, 0);
        assert_eq!(agv.retry_count, 1);
    }

    #[test]
    fn three_retries_against_waiting_blocker_steps_back() {
        let (graph, [a, node_b, c, _d]) = corridor();
        let mut agv = parked_agv(node_b, Point::new(100.0, 0.0));
        agv.previous_node = Some(a);
        agv.target_node = Some(c);
        agv.path = VecDeque::from(vec![c]);

        // Three full retry cycles, each still blocked by a WAITING peer.
        for _ in 0..3 {
            for _ in 0..=RETRY_INTERVAL {
                on_wait(&mut agv, &graph, Some(AgvStatus::Waiting), WaitReason::DestOccupied);
            }
        }

        assert_eq!(agv.status, AgvStatus::Detour);
        assert_eq!(agv.path.front(), Some(&a));
        assert_eq!(agv.retry_count, 0);
    }

    #[test]
    fn mid_edge_step_back_reverses_on_edge() {
        let (graph, [a, node_b, c, _d]) = corridor();
        let mut agv = parked_agv(a, Point::new(70.0, 0.0));
        agv.target_node = Some(c);
        agv.path = VecDeque::from(vec![node_b, c]);
        agv.progress = 0.7;
        agv.progress_distance = 70.0;

        for _ in 0..3 {
            for _ in 0..=RETRY_INTERVAL {
                on_wait(&mut agv, &graph, Some(AgvStatus::Waiting), WaitReason::MergeYield);
            }
        }

        assert_eq!(agv.status, AgvStatus::Repathing);
        assert_eq!(agv.current_node, node_b);
        assert_eq!(agv.path.front(), Some(&a));
    }

    #[test]
    fn retreat_prefers_previous_node_when_adjacent() {
        let (graph, [a, node_b, c, _d]) = corridor();
        let mut agv = parked_agv(node_b, Point::new(100.0, 0.0));
        agv.previous_node = Some(a);
        agv.path = VecDeque::from(vec![c]);
        assert_eq!(retreat_node(&agv, &graph), Some(a));
    }
}
