pub mod config;
pub mod screen;
pub mod types;

pub use config::{MotionConfig, SimConfig, TugOfWarConfig};
pub use screen::{FrameContext, Screen};
