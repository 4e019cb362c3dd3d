//! Seeded warehouse-floor map generation.
//!
//! Produces a node placement by rejection sampling and a sparse edge set by
//! nearest-neighbor connection, exactly as `spec.md` §4.2 describes. The
//! output is referentially transparent: the same seed string and node count
//! always produce the same `MapData`, since the only source of randomness is
//! `agv_core::Rng` seeded deterministically from the string.

use agv_core::Rng;

use crate::network::{Edge, MapData, Node};

const MIN_SPACING: f64 = 80.0;
const PADDING: f64 = 50.0;
const MAX_ATTEMPTS: u32 = 2000;

/// Generates a [`MapData`] from a seed string and a requested node count.
pub struct MapGenerator;

impl MapGenerator {
    /// Generate a map from a fresh `Rng` seeded from `seed`. `node_count` is
    /// clamped to `5..=200` per spec.
    ///
    /// Seeds and discards its own `Rng` — callers that need the engine-wide
    /// generator to continue past map generation's draws (e.g. auto-pilot,
    /// per §4.1/§8's single-stream determinism requirement) should use
    /// [`MapGenerator::generate_with_rng`] instead.
    pub fn generate(seed: &str, node_count: usize) -> MapData {
        let mut rng = Rng::from_str_seed(seed);
        Self::generate_with_rng(&mut rng, node_count)
    }

    /// Generate a map, drawing from the caller-supplied `rng` instead of
    /// seeding a new one. `node_count` is clamped to `5..=200` per spec.
    ///
    /// Lets a caller (e.g. `agv-sim::EngineBuilder`) continue the same
    /// stream afterward, rather than discarding it — the single
    /// engine-wide generator §4.1 specifies, not one per concern.
    pub fn generate_with_rng(rng: &mut Rng, node_count: usize) -> MapData {
        let node_count = node_count.clamp(5, 200);

        let area = (800.0 * 600.0_f64).max(node_count as f64 * 80.0 * 80.0 * 2.5);
        let height = (area / (4.0 / 3.0)).sqrt();
        let width = height * 4.0 / 3.0;

        let positions = place_nodes(rng, node_count, width, height);
        let nodes = label_nodes(positions);
        let edges = connect_nodes(rng, &nodes);

        MapData { nodes, edges }
    }
}

fn place_nodes(rng: &mut Rng, node_count: usize, width: f64, height: f64) -> Vec<(f64, f64)> {
    let mut placed: Vec<(f64, f64)> = Vec::with_capacity(node_count);
    let mut attempts = 0u32;

    while placed.len() < node_count && attempts < MAX_ATTEMPTS {
        attempts += 1;
        let x = PADDING + rng.next_f64() * (width - 2.0 * PADDING).max(1.0);
        let y = PADDING + rng.next_f64() * (height - 2.0 * PADDING).max(1.0);

        let too_close = placed.iter().any(|&(px, py)| {
            let dx = px - x;
            let dy = py - y;
            (dx * dx + dy * dy).sqrt() < MIN_SPACING
        });

        if !too_close {
            placed.push((x, y));
        }
    }

    placed
}

/// Labels `A, B, ..., Z, A1, B1, ...` in placement order.
fn label_nodes(positions: Vec<(f64, f64)>) -> Vec<Node> {
    positions
        .into_iter()
        .enumerate()
        .map(|(i, (x, y))| Node {
            id: agv_core::NodeId(i as u32),
            x: x.round() as i32,
            y: y.round() as i32,
            label: label_for_index(i),
        })
        .collect()
}

fn label_for_index(i: usize) -> String {
    let letter = (b'A' + (i % 26) as u8) as char;
    let suffix = i / 26;
    if suffix == 0 {
        letter.to_string()
    } else {
        format!("{letter}{suffix}")
    }
}

fn connect_nodes(rng: &mut Rng, nodes: &[Node]) -> Vec<Edge> {
    let mut connected: std::collections::HashSet<(u32, u32)> = std::collections::HashSet::new();
    let mut edges = Vec::new();

    for (i, node) in nodes.iter().enumerate() {
        let k = 2 + if rng.next_f64() > 0.6 { 1 } else { 0 };

        let mut others: Vec<usize> = (0..nodes.len()).filter(|&j| j != i).collect();
        others.sort_by(|&a, &b| {
            let da = dist(node, &nodes[a]);
            let db = dist(node, &nodes[b]);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });

        for &j in others.iter().take(k) {
            let (lo, hi) = if i < j { (i as u32, j as u32) } else { (j as u32, i as u32) };
            if connected.contains(&(lo, hi)) {
                continue;
            }
            connected.insert((lo, hi));

            let d = dist(node, &nodes[j]);
            let weight = (d * (0.8 + rng.next_f64() * 1.2)).round() as u32;
            let weight = weight.max(1);

            edges.push(Edge {
                source: agv_core::NodeId(lo),
                target: agv_core::NodeId(hi),
                weight,
            });
        }
    }

    edges
}

fn dist(a: &Node, b: &Node) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_map() {
        let a = MapGenerator::generate("warehouse-1", 20);
        let b = MapGenerator::generate("warehouse-1", 20);
        assert_eq!(a.nodes.len(), b.nodes.len());
        for (na, nb) in a.nodes.iter().zip(b.nodes.iter()) {
            assert_eq!(na, nb);
        }
        assert_eq!(a.edges.len(), b.edges.len());
    }

    #[test]
    fn generate_with_rng_continues_the_callers_stream() {
        // `generate` is just `generate_with_rng` over a freshly seeded `Rng`
        // that it then discards; calling `generate_with_rng` directly with
        // an equivalently-seeded `Rng` must produce the identical map, and
        // the `Rng` must have advanced past its draws for the caller to
        // keep consuming afterward.
        let mut rng = Rng::from_str_seed("warehouse-1");
        let via_rng = MapGenerator::generate_with_rng(&mut rng, 20);
        let via_seed = MapGenerator::generate("warehouse-1", 20);

        assert_eq!(via_rng.nodes, via_seed.nodes);
        assert_eq!(via_rng.edges, via_seed.edges);

        // The shared `rng` advanced: the next draw must not replay map
        // generation's first draw.
        let mut fresh = Rng::from_str_seed("warehouse-1");
        assert_ne!(rng.next_f64(), fresh.next_f64());
    }

    #[test]
    fn node_count_is_clamped() {
        let tiny = MapGenerator::generate("x", 1);
        assert!(tiny.nodes.len() <= 5);
        let huge = MapGenerator::generate("y", 10_000);
        assert!(huge.nodes.len() <= 200);
    }

    #[test]
    fn labels_follow_letter_then_suffix_scheme() {
        assert_eq!(label_for_index(0), "A");
        assert_eq!(label_for_index(25), "Z");
        assert_eq!(label_for_index(26), "A1");
        assert_eq!(label_for_index(27), "B1");
    }

    #[test]
    fn nodes_respect_minimum_spacing() {
        let map = MapGenerator::generate("spacing-check", 40);
        for i in 0..map.nodes.len() {
            for j in (i + 1)..map.nodes.len() {
                let d = dist(&map.nodes[i], &map.nodes[j]);
                assert!(d >= MIN_SPACING - 1.0, "nodes {i} and {j} too close: {d}");
            }
        }
    }

    #[test]
    fn every_edge_weight_is_positive() {
        let map = MapGenerator::generate("weights", 30);
        for e in &map.edges {
            assert!(e.weight > 0);
        }
    }
}
