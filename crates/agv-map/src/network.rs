//! Warehouse-floor graph representation and builder.
//!
//! # Data layout
//!
//! Unlike the CSR-plus-R-tree road network this crate is descended from, the
//! graph here is a plain adjacency list: `adjacency[n]` is the ordered
//! sequence of `(neighbor, weight)` pairs for node `n`, in the order edges
//! were added (the map generator adds them nearest-first, which the
//! pathfinder's K-shortest enumerator relies on for its "ascending edge
//! weight" neighbor-visit order). At warehouse-floor scale (≤ 200 nodes)
//! this is simpler than CSR packing and makes an R-tree nearest-node index
//! unnecessary.

use std::collections::HashMap;

use agv_core::{NodeId, Point};

/// A placed node: position, stable id, and a cosmetic label.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: NodeId,
    pub x: i32,
    pub y: i32,
    pub label: String,
}

impl Node {
    pub fn position(&self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }
}

/// An undirected edge with a positive integer weight. `source`/`target` carry
/// no directional meaning; both orderings refer to the same edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: u32,
}

impl Edge {
    /// `true` if `self` connects the same two nodes as `(a, b)`, regardless
    /// of order — used by the `avoid_edges` constraint in the pathfinder.
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// An immutable post-generation snapshot: the node and edge lists a
/// `Graph` is built from. Produced by [`crate::MapGenerator`] and consumed
/// by [`Graph::from_map_data`].
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapData {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// The warehouse-floor graph: node positions plus an adjacency list.
///
/// Construct via [`GraphBuilder`] or [`Graph::from_map_data`]. The graph need
/// not be connected — disconnected components are a valid, tolerated input
/// to the pathfinder, which simply reports `NoPath`.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    adjacency: Vec<Vec<(NodeId, u32)>>,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.node(id).map(Node::position)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Neighbors of `node` in the order their edges were added (nearest
    /// first, per the map generator) — relied on by the K-shortest
    /// enumerator's "ascending edge weight" DFS visit order.
    pub fn neighbors(&self, node: NodeId) -> &[(NodeId, u32)] {
        self.adjacency
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn are_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).iter().any(|&(n, _)| n == b)
    }

    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<u32> {
        self.neighbors(a).iter().find(|&&(n, _)| n == b).map(|&(_, w)| w)
    }

    pub fn edge_distance(&self, a: NodeId, b: NodeId) -> Option<f64> {
        Some(self.position(a)?.distance(self.position(b)?))
    }

    /// Rebuild a `Graph` from a generator's `MapData` snapshot.
    pub fn from_map_data(data: &MapData) -> Self {
        let mut builder = GraphBuilder::with_capacity(data.nodes.len());
        let mut placed: HashMap<NodeId, NodeId> = HashMap::with_capacity(data.nodes.len());
        for node in &data.nodes {
            let id = builder.add_node(node.x, node.y, node.label.clone());
            placed.insert(node.id, id);
        }
        for edge in &data.edges {
            if let (Some(&a), Some(&b)) = (placed.get(&edge.source), placed.get(&edge.target)) {
                builder.add_edge(a, b, edge.weight);
            }
        }
        builder.build()
    }

    /// Export the current graph back to a `MapData` snapshot (each
    /// undirected edge emitted once).
    pub fn to_map_data(&self) -> MapData {
        let mut edges = Vec::new();
        for (i, neighbors) in self.adjacency.iter().enumerate() {
            let from = NodeId(i as u32);
            for &(to, weight) in neighbors {
                if from.0 < to.0 {
                    edges.push(Edge { source: from, target: to, weight });
                }
            }
        }
        MapData { nodes: self.nodes.clone(), edges }
    }
}

/// Incrementally construct a [`Graph`], then call [`build`](Self::build).
pub struct GraphBuilder {
    nodes: Vec<Node>,
    adjacency: Vec<Vec<(NodeId, u32)>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), adjacency: Vec::new() }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self { nodes: Vec::with_capacity(n), adjacency: Vec::with_capacity(n) }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, x: i32, y: i32, label: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { id, x, y, label: label.into() });
        self.adjacency.push(Vec::new());
        id
    }

    /// Add an undirected edge between `a` and `b`. Stored in both
    /// adjacency lists; the caller is responsible for not adding the same
    /// unordered pair twice (the map generator already guarantees this).
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: u32) {
        self.adjacency[a.index()].push((b, weight));
        self.adjacency[b.index()].push((a, weight));
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn build(self) -> Graph {
        Graph { nodes: self.nodes, adjacency: self.adjacency }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
