//! Fluent builder for constructing an [`Engine`].

use agv_core::Rng;
use agv_fleet::{AgvConfig, Fleet};
use agv_map::{Graph, MapGenerator};

use crate::Engine;

/// Fluent builder for [`Engine`].
///
/// # Required inputs
///
/// - a seed string, used for both the engine's deterministic PRNG and (if no
///   explicit map is supplied) seeded map generation.
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default                                         |
/// |------------------------|--------------------------------------------------|
/// | `.map(graph)`          | a freshly generated 50-node map from the seed    |
/// | `.generate_map(n)`     | overrides the node count of the generated map    |
/// | `.default_config(cfg)` | `AgvConfig::default()`                           |
/// | `.auto_pilot(bool)`    | `false`                                          |
///
/// # Example
///
/// ```rust,ignore
/// let engine = EngineBuilder::new("warehouse-1")
///     .generate_map(80)
///     .auto_pilot(true)
///     .build();
/// ```
pub struct EngineBuilder {
    seed: String,
    graph: Option<Graph>,
    node_count: usize,
    default_config: AgvConfig,
    auto_pilot: bool,
}

/// §14's UI default node count, used when no explicit map or node count is
/// supplied.
const DEFAULT_NODE_COUNT: usize = 50;

impl EngineBuilder {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            graph: None,
            node_count: DEFAULT_NODE_COUNT,
            default_config: AgvConfig::default(),
            auto_pilot: false,
        }
    }

    /// Supply an explicit graph, bypassing seeded generation entirely.
    pub fn map(mut self, graph: Graph) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Override the node count used for seeded generation (ignored if
    /// `.map(...)` was also called).
    pub fn generate_map(mut self, node_count: usize) -> Self {
        self.node_count = node_count;
        self
    }

    pub fn default_config(mut self, config: AgvConfig) -> Self {
        self.default_config = config;
        self
    }

    pub fn auto_pilot(mut self, enabled: bool) -> Self {
        self.auto_pilot = enabled;
        self
    }

    /// Build the [`Engine`]. Infallible: an explicit `Graph` is taken as-is,
    /// and seeded generation (`MapGenerator::generate_with_rng`) cannot
    /// itself fail.
    ///
    /// The engine's `Rng` is seeded once here and, when no explicit `.map()`
    /// was supplied, is the very same stream `MapGenerator` draws node
    /// placement and edge weights from — auto-pilot then continues drawing
    /// from where map generation left off, rather than restarting at the
    /// seed's first draw, per §4.1/§8's single engine-wide generator.
    pub fn build(self) -> Engine {
        let mut rng = Rng::from_str_seed(&self.seed);

        let graph = match self.graph {
            Some(graph) => graph,
            None => {
                let data = MapGenerator::generate_with_rng(&mut rng, self.node_count);
                Graph::from_map_data(&data)
            }
        };

        Engine::new(graph, Fleet::with_default_config(self.default_config), rng, self.auto_pilot)
    }
}
