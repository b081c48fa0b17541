use glam::DVec2;
use crate::api::types::{KnotId, Side};
use crate::core::property::Property;

/// A fixed attachment point on the rope. Moves with the cart.
/// Holds no reference to its puller; occupancy is derived from the pullers.
#[derive(Debug)]
pub struct Knot {
    pub id: KnotId,
    pub side: Side,
    /// x when the cart is centered.
    pub initial_x: f64,
    pub x: Property<f64>,
    pub y: f64,
}

impl Knot {
    pub fn new(id: KnotId, side: Side, x: f64, y: f64) -> Self {
        Self {
            id,
            side,
            initial_x: x,
            x: Property::new("knot.x", x),
            y,
        }
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(*self.x.value(), self.y)
    }

    /// Follow the cart: the knot keeps its offset from the cart center.
    pub(crate) fn follow_cart(&mut self, cart_position: f64) {
        self.x.set(self.initial_x + cart_position);
    }
}
