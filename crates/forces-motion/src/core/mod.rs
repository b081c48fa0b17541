pub mod property;
pub mod time;

pub use property::{ListenerId, Property};
pub use time::FixedTimestep;
