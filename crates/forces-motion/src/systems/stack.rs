//! The skateboard stack on the motion screens.
//!
//! Stack order is insertion order. An item's place is derived solely from its
//! index: `y = baseline - index * spacing`, so every push or removal
//! recomputes the position of every stacked item.

use glam::DVec2;
use crate::api::config::MotionConfig;
use crate::api::types::ItemId;
use crate::components::item::Item;
use crate::error::ModelError;

#[derive(Debug, Clone)]
pub struct ItemStack {
    order: Vec<ItemId>,
    baseline: f64,
    spacing: f64,
    center_x: f64,
}

impl ItemStack {
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            order: Vec::new(),
            baseline: config.stack_baseline,
            spacing: config.stack_spacing,
            center_x: config.stack_center_x,
        }
    }

    /// Append `id` on top of the stack.
    pub fn push(&mut self, items: &mut [Item], id: ItemId) -> Result<(), ModelError> {
        let item = items.get(id.0).ok_or(ModelError::UnknownItem(id))?;
        if item.is_stacked() || self.order.contains(&id) {
            return Err(ModelError::ItemAlreadyStacked(id));
        }
        self.order.push(id);
        self.relayout(items);
        Ok(())
    }

    /// Remove the most recently pushed item.
    pub fn pop(&mut self, items: &mut [Item]) -> Option<ItemId> {
        let id = *self.order.last()?;
        self.remove(items, id).ok()?;
        Some(id)
    }

    /// Remove `id` from anywhere in the stack; items above it move down.
    pub fn remove(&mut self, items: &mut [Item], id: ItemId) -> Result<(), ModelError> {
        if id.0 >= items.len() {
            return Err(ModelError::UnknownItem(id));
        }
        let idx = self
            .order
            .iter()
            .position(|&stacked| stacked == id)
            .ok_or(ModelError::ItemNotStacked(id))?;
        self.order.remove(idx);
        items[id.0].return_home();
        self.relayout(items);
        Ok(())
    }

    /// Send every stacked item home.
    pub fn clear(&mut self, items: &mut [Item]) {
        for id in self.order.drain(..) {
            if let Some(item) = items.get_mut(id.0) {
                item.return_home();
            }
        }
    }

    pub fn position_for(&self, index: usize) -> DVec2 {
        DVec2::new(self.center_x, self.baseline - index as f64 * self.spacing)
    }

    /// y of the next free slot.
    pub fn top_of_stack(&self) -> f64 {
        self.baseline - self.order.len() as f64 * self.spacing
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.order
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.order.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn total_mass(&self, items: &[Item]) -> f64 {
        self.order.iter().filter_map(|id| items.get(id.0)).map(|item| item.mass).sum()
    }

    fn relayout(&self, items: &mut [Item]) {
        for (index, id) in self.order.iter().enumerate() {
            let position = self.position_for(index);
            items[id.0].place(index, position);
        }
    }
}
