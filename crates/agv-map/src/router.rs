//! Pathfinding over the warehouse-floor graph.
//!
//! Two algorithms, matching `spec.md` §4.3:
//!
//! - [`find_path`] — constrained single-source Dijkstra; the workhorse used
//!   by planning, head-on repath, and step-back.
//! - [`find_all_paths`] — a bounded DFS enumerator of simple paths ranked by
//!   cost, used only by the ranked-detour ladder as a cruder fallback. Its
//!   `limit` is a hard safety valve against the exponential worst case.
//!
//! Both exclude the start node from the returned path (the result is "the
//! steps to take", not including where you already are) and both tolerate a
//! disconnected graph by returning an empty result.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use agv_core::NodeId;

use crate::network::Graph;

/// Unordered edge, used for the `avoid_edges` constraint.
pub type UndirectedEdge = (NodeId, NodeId);

fn normalize(a: NodeId, b: NodeId) -> UndirectedEdge {
    if a.0 <= b.0 { (a, b) } else { (b, a) }
}

fn edge_is_avoided(avoid_edges: &HashSet<UndirectedEdge>, a: NodeId, b: NodeId) -> bool {
    avoid_edges.contains(&normalize(a, b))
}

/// Constrained single-source shortest path.
///
/// `avoid_nodes` are treated as absent from the graph entirely (neither
/// traversable nor reachable); `avoid_edges` are skipped in both directions.
/// Returns the path from `start` to `goal` **excluding `start`**, or an empty
/// `Vec` if `goal` is unreachable under the constraints.
pub fn find_path(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    avoid_nodes: &HashSet<NodeId>,
    avoid_edges: &HashSet<UndirectedEdge>,
) -> Vec<NodeId> {
    if start == goal || avoid_nodes.contains(&goal) {
        return Vec::new();
    }

    let n = graph.node_count();
    let mut dist = vec![u32::MAX; n];
    let mut prev: Vec<Option<NodeId>> = vec![None; n];
    let mut visited = vec![false; n];

    dist[start.index()] = 0;
    let mut heap: BinaryHeap<Reverse<(u32, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, start)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if visited[node.index()] {
            continue;
        }
        visited[node.index()] = true;

        if node == goal {
            return reconstruct(&prev, start, goal);
        }

        for &(neighbor, weight) in graph.neighbors(node) {
            if avoid_nodes.contains(&neighbor) || edge_is_avoided(avoid_edges, node, neighbor) {
                continue;
            }
            if visited[neighbor.index()] {
                continue;
            }
            let new_cost = cost.saturating_add(weight);
            // First-discovered predecessor wins on ties (insertion order of
            // the adjacency list, not re-examined once `dist` is matched).
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = Some(node);
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Vec::new()
}

fn reconstruct(prev: &[Option<NodeId>], start: NodeId, goal: NodeId) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut cur = goal;
    loop {
        path.push(cur);
        match prev[cur.index()] {
            Some(p) if p != start => cur = p,
            Some(_) => break,
            None => {
                // `cur == start` only reachable if goal == start, already
                // handled by the caller; otherwise this is unreachable.
                return Vec::new();
            }
        }
    }
    path.reverse();
    path
}

/// Bounded DFS enumeration of simple paths from `start` to `goal`, ranked by
/// total cost ascending. Neighbors are visited in ascending edge-weight
/// order at each step; enumeration stops once `limit` paths have been
/// collected. Excludes `start` from each returned path, like [`find_path`].
pub fn find_all_paths(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    avoid_nodes: &HashSet<NodeId>,
    avoid_edges: &HashSet<UndirectedEdge>,
    limit: usize,
) -> Vec<Vec<NodeId>> {
    if start == goal || avoid_nodes.contains(&goal) || limit == 0 {
        return Vec::new();
    }

    let mut found: Vec<(u32, Vec<NodeId>)> = Vec::new();
    let mut visiting = HashSet::new();
    visiting.insert(start);
    let mut path = Vec::new();

    dfs(
        graph,
        start,
        goal,
        avoid_nodes,
        avoid_edges,
        limit,
        0,
        &mut visiting,
        &mut path,
        &mut found,
    );

    found.sort_by_key(|(cost, _)| *cost);
    found.into_iter().map(|(_, p)| p).collect()
}

#[allow(clippy::too_many_arguments)]
fn dfs(
    graph: &Graph,
    node: NodeId,
    goal: NodeId,
    avoid_nodes: &HashSet<NodeId>,
    avoid_edges: &HashSet<UndirectedEdge>,
    limit: usize,
    cost_so_far: u32,
    visiting: &mut HashSet<NodeId>,
    path: &mut Vec<NodeId>,
    found: &mut Vec<(u32, Vec<NodeId>)>,
) {
    if found.len() >= limit {
        return;
    }

    let mut neighbors: Vec<(NodeId, u32)> = graph
        .neighbors(node)
        .iter()
        .copied()
        .filter(|&(n, _)| !avoid_nodes.contains(&n) && !edge_is_avoided(avoid_edges, node, n))
        .collect();
    neighbors.sort_by_key(|&(_, w)| w);

    for (next, weight) in neighbors {
        if found.len() >= limit {
            return;
        }
        if visiting.contains(&next) {
            continue;
        }

        path.push(next);
        let total = cost_so_far + weight;

        if next == goal {
            found.push((total, path.clone()));
        } else {
            visiting.insert(next);
            dfs(
                graph, next, goal, avoid_nodes, avoid_edges, limit, total, visiting, path, found,
            );
            visiting.remove(&next);
        }

        path.pop();
    }
}
