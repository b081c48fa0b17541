use crate::api::types::{DisplayToggle, ItemId, PullerId, ScreenId};

/// Input events the model understands.
/// The view does hit-testing and gesture recognition; by the time an event
/// lands here it already names its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The pusher was dragged horizontally by `dx` view units.
    PusherDrag { dx: f64 },
    /// The pusher drag ended.
    PusherRelease,
    /// Applied force control (spinner/slider) set to an absolute value.
    SetAppliedForce { value: f64 },
    /// Friction control set to an absolute coefficient.
    SetFriction { value: f64 },
    /// An item was dropped onto the skateboard.
    StackItem { item: ItemId },
    /// An item was dragged off the skateboard.
    UnstackItem { item: ItemId },
    /// A puller drag began.
    PullerGrab { puller: PullerId },
    /// A dragged puller moved to (x, y).
    PullerMove { puller: PullerId, x: f64, y: f64 },
    /// A puller drag ended.
    PullerDrop { puller: PullerId },
    /// Keyboard path: send an attached puller back to its toolbox.
    ReturnPuller { puller: PullerId },
    /// The go/pause button.
    GoPause,
    /// The return button shown when a tug-of-war game is over.
    ReturnCart,
    /// Reset all.
    Reset,
    /// A check box changed.
    Toggle { toggle: DisplayToggle, on: bool },
    /// A navigation bar tab was selected.
    SelectScreen { screen: ScreenId },
}

/// Numeric `kind` codes used by `InputEvent::from_custom`.
pub mod custom_kinds {
    pub const PUSHER_DRAG: u32 = 1;
    pub const PUSHER_RELEASE: u32 = 2;
    pub const SET_APPLIED_FORCE: u32 = 3;
    pub const SET_FRICTION: u32 = 4;
    pub const STACK_ITEM: u32 = 5;
    pub const UNSTACK_ITEM: u32 = 6;
    pub const PULLER_GRAB: u32 = 7;
    pub const PULLER_MOVE: u32 = 8;
    pub const PULLER_DROP: u32 = 9;
    pub const RETURN_PULLER: u32 = 10;
    pub const GO_PAUSE: u32 = 11;
    pub const RETURN_CART: u32 = 12;
    pub const RESET: u32 = 13;
    pub const TOGGLE: u32 = 14;
    pub const SELECT_SCREEN: u32 = 15;
}

impl InputEvent {
    /// Decode the flat `(kind, a, b, c)` form sent across the wasm boundary.
    /// Indices travel as floats; negative, fractional or unknown values are
    /// rejected.
    pub fn from_custom(kind: u32, a: f64, b: f64, c: f64) -> Option<Self> {
        use custom_kinds::*;
        let event = match kind {
            PUSHER_DRAG => InputEvent::PusherDrag { dx: a },
            PUSHER_RELEASE => InputEvent::PusherRelease,
            SET_APPLIED_FORCE => InputEvent::SetAppliedForce { value: a },
            SET_FRICTION => InputEvent::SetFriction { value: a },
            STACK_ITEM => InputEvent::StackItem { item: ItemId(index(a)?) },
            UNSTACK_ITEM => InputEvent::UnstackItem { item: ItemId(index(a)?) },
            PULLER_GRAB => InputEvent::PullerGrab { puller: PullerId(index(a)?) },
            PULLER_MOVE => InputEvent::PullerMove { puller: PullerId(index(a)?), x: b, y: c },
            PULLER_DROP => InputEvent::PullerDrop { puller: PullerId(index(a)?) },
            RETURN_PULLER => InputEvent::ReturnPuller { puller: PullerId(index(a)?) },
            GO_PAUSE => InputEvent::GoPause,
            RETURN_CART => InputEvent::ReturnCart,
            RESET => InputEvent::Reset,
            TOGGLE => InputEvent::Toggle {
                toggle: DisplayToggle::from_index(index(a)? as u32)?,
                on: b != 0.0,
            },
            SELECT_SCREEN => InputEvent::SelectScreen {
                screen: ScreenId::from_index(index(a)? as u32)?,
            },
            _ => return None,
        };
        Some(event)
    }
}

fn index(value: f64) -> Option<usize> {
    if value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as usize)
    } else {
        None
    }
}

/// A queue of input events.
/// The view pushes events as they happen; the runner drains them once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
