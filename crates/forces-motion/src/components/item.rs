use glam::DVec2;
use crate::api::types::ItemId;
use crate::core::property::Property;

/// Image name, mass, natural x, natural y.
const CATALOG: [(&str, f64, f64, f64); 7] = [
    ("fridge", 100.0, 41.0, 476.0),
    ("crate", 100.0, 195.0, 495.0),
    ("crate", 100.0, 114.0, 495.0),
    ("girl-standing", 100.0, 632.0, 450.0),
    ("man-standing", 100.0, 719.0, 365.0),
    ("trash-can", 100.0, 851.0, 511.0),
    ("mystery-object-01", 100.0, 800.0, 590.0),
];

/// A stackable object on the motion screens.
/// Passive record: the stack manager decides where it sits.
#[derive(Debug)]
pub struct Item {
    pub id: ItemId,
    /// Image identifier. Not unique (there are two crates).
    pub name: &'static str,
    pub mass: f64,
    /// Where the item rests when it is not on the stack.
    pub home: DVec2,
    pub position: Property<DVec2>,
    /// Index in the stack, `None` while the item sits at home.
    pub stack_index: Property<Option<usize>>,
}

impl Item {
    pub fn new(id: ItemId, name: &'static str, mass: f64, home: DVec2) -> Self {
        Self {
            id,
            name,
            mass,
            home,
            position: Property::new("item.position", home),
            stack_index: Property::new("item.stackIndex", None),
        }
    }

    /// The fixed set of seven items, indexed by `ItemId`.
    pub fn catalog() -> Vec<Item> {
        CATALOG
            .iter()
            .enumerate()
            .map(|(i, &(name, mass, x, y))| Item::new(ItemId(i), name, mass, DVec2::new(x, y)))
            .collect()
    }

    pub fn is_stacked(&self) -> bool {
        self.stack_index.value().is_some()
    }

    pub(crate) fn place(&mut self, index: usize, position: DVec2) {
        self.stack_index.set(Some(index));
        self.position.set(position);
    }

    pub(crate) fn return_home(&mut self) {
        self.stack_index.set(None);
        self.position.set(self.home);
    }

    /// Per-item animation hook, called for stacked items on every motion tick.
    pub fn step(&mut self, _dt: f64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_seven_items_at_home() {
        let items = Item::catalog();
        assert_eq!(items.len(), 7);
        assert_eq!(items[0].name, "fridge");
        assert_eq!(items[6].home, DVec2::new(800.0, 590.0));
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.id, ItemId(i));
            assert_eq!(item.position.get(), item.home);
            assert!(!item.is_stacked());
        }
    }

    #[test]
    fn return_home_clears_stack_index() {
        let mut item = Item::new(ItemId(0), "crate", 100.0, DVec2::new(1.0, 2.0));
        item.place(2, DVec2::new(490.0, 150.0));
        assert_eq!(item.stack_index.get(), Some(2));
        item.return_home();
        assert_eq!(item.stack_index.get(), None);
        assert_eq!(item.position.get(), DVec2::new(1.0, 2.0));
    }
}
