//! Serializable snapshots of each screen's model.
//!
//! Only independent state is captured. Derived values (net force, force sums,
//! speed, knot positions) are recomputed on restore.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use crate::api::types::{GameState, ItemId, KnotId, MotionScreenKind, ScreenId, Side};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    pub force: bool,
    pub sum_of_forces: bool,
    pub values: bool,
    pub speed: bool,
    pub masses: bool,
    pub acceleration: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub kind: MotionScreenKind,
    pub applied_force: f64,
    pub friction: f64,
    pub velocity: f64,
    pub position: f64,
    pub pusher_position: f64,
    pub running: bool,
    pub display: DisplayState,
    /// Bottom to top.
    pub stack: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TugDisplayState {
    pub sum_of_forces: bool,
    pub values: bool,
    pub speed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullerState {
    pub position: DVec2,
    pub knot: Option<KnotId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetForceState {
    pub cart_position: f64,
    pub state: GameState,
    pub running: bool,
    pub winner: Option<Side>,
    pub time: f64,
    pub display: TugDisplayState,
    /// Indexed by `PullerId`.
    pub pullers: Vec<PullerState>,
}

/// Whole-simulation snapshot: every screen plus the selected tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub active: ScreenId,
    pub tug_of_war: NetForceState,
    pub motion: MotionState,
    pub friction: MotionState,
    pub acceleration: MotionState,
}
