//! `agv-map` — warehouse-floor graph, seeded map generation, and pathfinding.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|-------------------------------------------------------------|
//! | [`network`]  | `Node`, `Edge`, `Graph`, `GraphBuilder`, `MapData`          |
//! | [`generator`]| `MapGenerator` — seeded node placement + edge synthesis     |
//! | [`router`]   | `find_path` (constrained Dijkstra), `find_all_paths` (K-shortest) |
//! | [`error`]    | `MapError`, `MapResult<T>`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |
//!
//! This crate replaces the CSR-plus-R-tree road network of the digital-twin
//! framework it descends from with a plain adjacency-list graph: warehouse
//! floors here top out around 200 nodes, well below the scale where CSR
//! packing or an R-tree nearest-node index pay for their complexity (see
//! `DESIGN.md` for the dropped-dependency rationale).

pub mod error;
pub mod generator;
pub mod network;
pub mod router;


pub use error::{MapError, MapResult};
pub use generator::MapGenerator;
pub use network::{Edge, Graph, GraphBuilder, MapData, Node};
pub use router::{find_all_paths, find_path};
