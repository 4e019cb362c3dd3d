//! The arbiter's output type.

use agv_core::{AgvId, NodeId};
use agv_fleet::WaitReason;

/// What the ego AGV should do this tick, per `spec.md` §4.4.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Move,
    Wait,
    RepathHeadOn,
}

/// The arbiter's full verdict: an action plus the context needed to apply it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Verdict {
    pub action: Action,
    /// Set when `action` is `Wait`.
    pub reason: Option<WaitReason>,
    /// Set when `action` is `RepathHeadOn`: the undirected edge to avoid on
    /// the replan.
    pub avoid: Option<(NodeId, NodeId)>,
    /// The other AGV responsible for a non-`Move` verdict, if any — recovery
    /// uses this to decide whether to step back (§4.6's "blocker itself is
    /// WAITING or BLOCKED").
    pub blocker: Option<AgvId>,
}

impl Verdict {
    pub fn move_() -> Self {
        Self { action: Action::Move, reason: None, avoid: None, blocker: None }
    }

    pub fn wait(reason: WaitReason, blocker: AgvId) -> Self {
        Self { action: Action::Wait, reason: Some(reason), avoid: None, blocker: Some(blocker) }
    }

    pub fn repath_head_on(avoid: (NodeId, NodeId), blocker: AgvId) -> Self {
        Self {
            action: Action::RepathHeadOn,
            reason: None,
            avoid: Some(avoid),
            blocker: Some(blocker),
        }
    }
}
