use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Index of a puller in its model's puller catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PullerId(pub usize);

/// Index of a knot on the rope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KnotId(pub usize);

/// Index of an item in the motion screens' item catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub usize);

/// Rope side. The left (blue) team pulls toward negative x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// -1 for left, +1 for right; net force is right-positive.
    pub fn sign(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    pub fn team(self) -> &'static str {
        match self {
            Side::Left => "blue",
            Side::Right => "red",
        }
    }
}

/// Puller size class. Determines the force a puller exerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PullerSize {
    Small,
    Medium,
    Large,
}

impl PullerSize {
    pub fn force(self) -> f64 {
        match self {
            PullerSize::Small => 50.0,
            PullerSize::Medium => 100.0,
            PullerSize::Large => 150.0,
        }
    }
}

/// Tug-of-war game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    NotStarted,
    Started,
    GameOver,
}

/// Which flavor of the motion sandbox a `MotionModel` drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionScreenKind {
    Motion,
    Friction,
    Acceleration,
}

impl MotionScreenKind {
    /// The motion screen has no friction control.
    pub fn has_friction_control(self) -> bool {
        !matches!(self, MotionScreenKind::Motion)
    }
}

/// The four screens of the simulation, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScreenId {
    #[default]
    TugOfWar,
    Motion,
    Friction,
    Acceleration,
}

impl ScreenId {
    pub const ALL: [ScreenId; 4] = [
        ScreenId::TugOfWar,
        ScreenId::Motion,
        ScreenId::Friction,
        ScreenId::Acceleration,
    ];

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u32 {
        self as u32
    }
}

/// Check boxes on the control panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayToggle {
    Force,
    SumOfForces,
    Values,
    Speed,
    Masses,
    Acceleration,
}

impl DisplayToggle {
    pub const ALL: [DisplayToggle; 6] = [
        DisplayToggle::Force,
        DisplayToggle::SumOfForces,
        DisplayToggle::Values,
        DisplayToggle::Speed,
        DisplayToggle::Masses,
        DisplayToggle::Acceleration,
    ];

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// A model event communicated to the view via a flat float buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SimEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl SimEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

/// `SimEvent::kind` values.
pub mod sim_events {
    /// a = winner sign (-1 left, +1 right), b = final cart position.
    pub const GAME_OVER: f32 = 1.0;
    pub const CART_RETURNED: f32 = 2.0;
    pub const RESET: f32 = 3.0;
    /// a = puller index, b = knot index.
    pub const PULLER_ATTACHED: f32 = 4.0;
    /// a = puller index.
    pub const PULLER_DETACHED: f32 = 5.0;
    /// a = net force, b = cart position. Emitted every tug-of-war tick.
    pub const NET_FORCE: f32 = 6.0;
    /// a = velocity, b = position, c = applied force. Emitted every motion tick.
    pub const MOTION: f32 = 7.0;
    /// a = new screen index.
    pub const SCREEN_CHANGED: f32 = 8.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_classes_map_to_forces() {
        assert_eq!(PullerSize::Small.force(), 50.0);
        assert_eq!(PullerSize::Medium.force(), 100.0);
        assert_eq!(PullerSize::Large.force(), 150.0);
    }

    #[test]
    fn screen_ids_round_trip_through_index() {
        for screen in ScreenId::ALL {
            assert_eq!(ScreenId::from_index(screen.index()), Some(screen));
        }
        assert_eq!(ScreenId::from_index(9), None);
    }

    #[test]
    fn sim_event_is_four_floats() {
        let events = [SimEvent::new(1.0, 2.0, 3.0, 4.0)];
        let floats: &[f32] = bytemuck::cast_slice(&events);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(floats.len(), SimEvent::FLOATS);
    }
}
