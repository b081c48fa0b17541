pub mod item;
pub mod knot;
pub mod puller;

pub use item::Item;
pub use knot::Knot;
pub use puller::Puller;
