//! The AGV record and its status tag.

use std::collections::VecDeque;

use agv_core::{AgvId, NodeId, Point, Tick};

use crate::config::AgvConfig;

/// The vehicle's current phase in the navigation state machine (`spec.md`
/// §4.6). A tagged sum type, per the design note that the driver's
/// top-level per-tick logic is a match on verdict and status.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgvStatus {
    Idle,
    Planning,
    Moving,
    Waiting,
    Blocked,
    Repathing,
    Detour,
    Completed,
}

impl AgvStatus {
    /// `true` for `Idle` or `Completed` — the two statuses the auto-pilot
    /// will assign a fresh target to.
    pub fn is_idle_or_completed(self) -> bool {
        matches!(self, AgvStatus::Idle | AgvStatus::Completed)
    }
}

/// Human-readable reason the arbiter last parked this AGV in `WAIT`
/// (`spec.md` §4.4's rule table), or that `setTarget` left it `IDLE`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WaitReason {
    NodeReserved(NodeId),
    DestOccupied,
    YieldEntry,
    WaitingNode(NodeId),
    MergeYield,
    FrontSensor,
    /// `setTarget` could not find a path to the requested node.
    NoPath,
}

impl std::fmt::Display for WaitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaitReason::NodeReserved(n) => write!(f, "Node {n} Reserved"),
            WaitReason::DestOccupied => write!(f, "Dest Occupied"),
            WaitReason::YieldEntry => write!(f, "Yield Entry"),
            WaitReason::WaitingNode(n) => write!(f, "Waiting Node {n}"),
            WaitReason::MergeYield => write!(f, "Merge Yield"),
            WaitReason::FrontSensor => write!(f, "Front Sensor"),
            WaitReason::NoPath => write!(f, "no path"),
        }
    }
}

/// A single vehicle's complete state.
///
/// See `spec.md` §3 for the field-by-field invariants (status ↔ path ↔
/// target consistency, `progress == progressDistance / edge distance`,
/// `reservedNodes` bounded by `hardBorrowLength`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agv {
    pub id: AgvId,
    pub color: String,

    pub x: f64,
    pub y: f64,
    /// Heading of the active edge, in degrees.
    pub orientation: f64,
    pub current_speed: f64,

    pub current_node: NodeId,
    pub previous_node: Option<NodeId>,
    /// Remaining node sequence to traverse; `path[0]` is the immediate
    /// destination. A `VecDeque` avoids O(n) shifts on arrival (§9's "prefer
    /// a front-pop structure" guidance).
    pub path: VecDeque<NodeId>,
    pub target_node: Option<NodeId>,

    pub progress: f64,
    pub progress_distance: f64,

    pub status: AgvStatus,
    pub path_rank: u32,
    pub retry_count: u32,
    pub wait_timer: u64,
    pub wait_reason: Option<WaitReason>,
    /// Lease on the first `config.hard_borrow_length` nodes of `path`.
    pub reserved_nodes: Vec<NodeId>,
    /// Monotonic timestamp of the last `setTarget`/replan, used as a
    /// first-come tiebreak in R2b.
    pub path_planning_time: Tick,

    pub config: AgvConfig,
}

impl Agv {
    /// A freshly spawned AGV: idle at `node`, no path, default kinematics.
    pub fn new(id: AgvId, node: NodeId, position: Point, config: AgvConfig) -> Self {
        Self {
            id,
            color: default_color(id),
            x: position.x,
            y: position.y,
            orientation: 0.0,
            current_speed: 0.0,
            current_node: node,
            previous_node: None,
            path: VecDeque::new(),
            target_node: None,
            progress: 0.0,
            progress_distance: 0.0,
            status: AgvStatus::Idle,
            path_rank: 0,
            retry_count: 0,
            wait_timer: 0,
            wait_reason: None,
            reserved_nodes: Vec::new(),
            path_planning_time: Tick::ZERO,
            config,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Heading of the active edge, in radians.
    pub fn heading_rad(&self) -> f64 {
        self.orientation.to_radians()
    }

    /// Recompute `reserved_nodes` from the current `path` prefix, bounded by
    /// `config.hard_borrow_length`. Called on every path mutation (planning,
    /// detour, step-back, arrival) and cleared on IDLE/COMPLETED.
    pub fn refresh_reservations(&mut self) {
        if self.status.is_idle_or_completed() {
            self.reserved_nodes.clear();
            return;
        }
        let take = self.config.hard_borrow_length as usize;
        self.reserved_nodes = self.path.iter().take(take).copied().collect();
    }

    /// `true` if this AGV currently holds a lease on `node`.
    pub fn reserves(&self, node: NodeId) -> bool {
        self.reserved_nodes.contains(&node)
    }

    /// The node this AGV is about to depart toward, if any.
    pub fn next_node(&self) -> Option<NodeId> {
        self.path.front().copied()
    }
}

fn default_color(id: AgvId) -> String {
    const PALETTE: [&str; 8] = [
        "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
    ];
    PALETTE[id.index() % PALETTE.len()].to_string()
}
