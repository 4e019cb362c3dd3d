//! Per-vehicle kinematic and reservation configuration.

/// Per-AGV tunables. An individual vehicle's `AgvConfig` may diverge from
/// the fleet-wide default it was spawned with — `Engine::update_config`
/// targets either a single AGV or the default template, never both at once.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgvConfig {
    pub max_speed: f64,
    pub acceleration: f64,
    pub deceleration: f64,
    pub safety_distance: f64,
    pub hard_borrow_length: u8,
}

impl AgvConfig {
    /// `hard_borrow_length` fits in a handful of bits; values above this are
    /// rejected by `InvalidConfigValue` rather than silently clamped.
    pub const MAX_HARD_BORROW_LENGTH: u8 = 8;
}

impl Default for AgvConfig {
    /// Matches `spec.md` §6's config defaults exactly, required for
    /// cross-implementation equivalence.
    fn default() -> Self {
        Self {
            max_speed: 1.4,
            acceleration: 0.10,
            deceleration: 0.15,
            safety_distance: 35.0,
            hard_borrow_length: 1,
        }
    }
}
