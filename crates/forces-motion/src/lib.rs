//! Headless model core for Forces and Motion: Basics.
//!
//! Observable properties, the tug-of-war net force game and the
//! motion/friction/acceleration sandbox. Rendering, drag hit-testing and
//! audio live in the host view, which drives a `Screen` with input events and
//! fixed ticks.

pub mod api;
pub mod bridge;
pub mod components;
pub mod core;
pub mod error;
pub mod input;
pub mod sim;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{MotionConfig, SimConfig, TugOfWarConfig};
pub use api::screen::{FrameContext, Screen};
pub use api::types::{
    sim_events, DisplayToggle, GameState, ItemId, KnotId, MotionScreenKind, PullerId,
    PullerSize, ScreenId, Side, SimEvent,
};
pub use bridge::state::{MotionState, NetForceState, SimState};
pub use components::{Item, Knot, Puller};
pub use core::property::{ListenerId, Property};
pub use core::time::FixedTimestep;
pub use error::ModelError;
pub use input::queue::{custom_kinds, InputEvent, InputQueue};
pub use sim::Sim;
pub use systems::motion::MotionModel;
pub use systems::netforce::NetForceModel;
pub use systems::stack::ItemStack;
