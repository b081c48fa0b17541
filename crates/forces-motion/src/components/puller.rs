use glam::DVec2;
use crate::api::types::{KnotId, PullerId, PullerSize, Side};
use crate::core::property::Property;

/// Team, size, toolbox x. Both toolboxes sit at the same height.
const CATALOG: [(Side, PullerSize, f64); 8] = [
    (Side::Left, PullerSize::Large, 208.0),
    (Side::Left, PullerSize::Medium, 149.0),
    (Side::Left, PullerSize::Small, 88.0),
    (Side::Left, PullerSize::Small, 37.0),
    (Side::Right, PullerSize::Small, 755.0),
    (Side::Right, PullerSize::Small, 806.0),
    (Side::Right, PullerSize::Medium, 855.0),
    (Side::Right, PullerSize::Large, 911.0),
];

const TOOLBOX_Y: f64 = 478.0;

/// A draggable team member. Exerts `force()` toward its own side while
/// attached to a knot. The knot reference is an id into the owning model.
#[derive(Debug)]
pub struct Puller {
    pub id: PullerId,
    pub side: Side,
    pub size: PullerSize,
    /// Toolbox position the puller returns to when dropped off the rope.
    pub home: DVec2,
    pub position: Property<DVec2>,
    pub dragging: Property<bool>,
    pub knot: Property<Option<KnotId>>,
    /// Knot a drop at the current drag position would attach to.
    pub hover_knot: Property<Option<KnotId>>,
}

impl Puller {
    pub fn new(id: PullerId, side: Side, size: PullerSize, home: DVec2) -> Self {
        Self {
            id,
            side,
            size,
            home,
            position: Property::new("puller.position", home),
            dragging: Property::new("puller.dragging", false),
            knot: Property::new("puller.knot", None),
            hover_knot: Property::new("puller.hoverKnot", None),
        }
    }

    /// Four blue pullers followed by four red pullers, indexed by `PullerId`.
    pub fn catalog() -> Vec<Puller> {
        CATALOG
            .iter()
            .enumerate()
            .map(|(i, &(side, size, x))| Puller::new(PullerId(i), side, size, DVec2::new(x, TOOLBOX_Y)))
            .collect()
    }

    pub fn force(&self) -> f64 {
        self.size.force()
    }

    /// Signed contribution to the right-positive net force.
    pub fn signed_force(&self) -> f64 {
        self.side.sign() * self.force()
    }

    pub fn is_attached(&self) -> bool {
        self.knot.value().is_some()
    }

    pub fn is_attached_to(&self, knot: KnotId) -> bool {
        *self.knot.value() == Some(knot)
    }

    /// Back to the toolbox: detached, not dragging, at home.
    pub(crate) fn return_home(&mut self) {
        self.knot.set(None);
        self.hover_knot.set(None);
        self.dragging.set(false);
        self.position.set(self.home);
    }
}
