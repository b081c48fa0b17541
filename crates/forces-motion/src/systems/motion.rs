//! Motion, friction and acceleration screens.
//!
//! One fixed tick of the integrator:
//!
//! ```text
//! acceleration = applied_force / mass
//! velocity'    = velocity + acceleration * dt
//! position'    = position + velocity' * dt
//! ```
//!
//! Velocity and position are not clamped. A pusher held at full force grows
//! them without bound; the pusher just falls over once speed reaches
//! `max_speed`.

use crate::api::config::SimConfig;
use crate::api::screen::{FrameContext, Screen};
use crate::api::types::{sim_events, DisplayToggle, ItemId, MotionScreenKind, SimEvent};
use crate::bridge::state::{DisplayState, MotionState};
use crate::components::item::Item;
use crate::core::property::Property;
use crate::error::ModelError;
use crate::input::queue::InputEvent;
use crate::systems::stack::ItemStack;

pub struct MotionModel {
    kind: MotionScreenKind,
    config: SimConfig,
    pub applied_force: Property<f64>,
    /// Friction coefficient. Observable state only: the integrator does not
    /// apply it.
    pub friction: Property<f64>,
    pub velocity: Property<f64>,
    pub position: Property<f64>,
    /// |velocity|.
    pub speed: Property<f64>,
    /// Acceleration of the most recent tick.
    pub acceleration: Property<f64>,
    pub pusher_position: Property<f64>,
    /// The pusher cannot keep up at `max_speed` and falls.
    pub pusher_fallen: Property<bool>,
    pub running: Property<bool>,
    pub show_force: Property<bool>,
    pub show_sum_of_forces: Property<bool>,
    pub show_values: Property<bool>,
    pub show_speed: Property<bool>,
    pub show_masses: Property<bool>,
    pub show_acceleration: Property<bool>,
    items: Vec<Item>,
    stack: ItemStack,
}

impl MotionModel {
    pub fn new(kind: MotionScreenKind) -> Self {
        Self::with_config(kind, SimConfig::default())
    }

    pub fn with_config(kind: MotionScreenKind, config: SimConfig) -> Self {
        let stack = ItemStack::new(&config.motion);
        Self {
            kind,
            config,
            applied_force: Property::new("appliedForce", 0.0),
            friction: Property::new("friction", 0.0),
            velocity: Property::new("velocity", 0.0),
            position: Property::new("position", 0.0),
            speed: Property::new("speed", 0.0),
            acceleration: Property::new("acceleration", 0.0),
            pusher_position: Property::new("pusherPosition", 0.0),
            pusher_fallen: Property::new("pusherFallen", false),
            running: Property::new("running", true),
            show_force: Property::new("showForce", true),
            show_sum_of_forces: Property::new("showSumOfForces", false),
            show_values: Property::new("showValues", false),
            show_speed: Property::new("showSpeed", true),
            show_masses: Property::new("showMasses", false),
            show_acceleration: Property::new("showAcceleration", false),
            items: Item::catalog(),
            stack,
        }
    }

    pub fn kind(&self) -> MotionScreenKind {
        self.kind
    }

    /// Advance one tick. Runs regardless of `running`; `update` gates on it.
    pub fn step(&mut self) {
        let dt = self.config.motion.dt;
        let acceleration = self.applied_force.get() / self.config.motion.mass;
        let velocity = self.velocity.get() + acceleration * dt;
        let position = self.position.get() + velocity * dt;
        self.acceleration.set(acceleration);
        self.velocity.set(velocity);
        self.position.set(position);

        for id in self.stack.ids() {
            self.items[id.0].step(dt);
        }
        self.refresh_pusher();
    }

    pub fn set_applied_force(&mut self, value: f64) {
        self.applied_force.set(value);
        self.refresh_pusher();
    }

    /// Pusher drag: `dx` view units add `dx / divisor` of force, clamped.
    pub fn drag_pusher(&mut self, dx: f64) {
        let limit = self.config.motion.max_applied_force;
        let force = self.applied_force.get() + dx / self.config.motion.pusher_drag_divisor;
        self.set_applied_force(force.clamp(-limit, limit));
    }

    pub fn release_pusher(&mut self) {
        self.set_applied_force(0.0);
    }

    /// Returns `false` if this screen has no friction control.
    pub fn set_friction(&mut self, value: f64) -> bool {
        if !self.kind.has_friction_control() {
            log::debug!("{:?}: friction is fixed on this screen", self.kind);
            return false;
        }
        self.friction.set(value.max(0.0));
        true
    }

    pub fn toggle_go_pause(&mut self) {
        let running = self.running.get();
        self.running.set(!running);
    }

    pub fn stack_item(&mut self, id: ItemId) -> Result<(), ModelError> {
        self.stack.push(&mut self.items, id)
    }

    pub fn unstack_item(&mut self, id: ItemId) -> Result<(), ModelError> {
        self.stack.remove(&mut self.items, id)
    }

    pub fn pop_item(&mut self) -> Option<ItemId> {
        self.stack.pop(&mut self.items)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.0)
    }

    /// Mutable item access, for linking listeners.
    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(id.0)
    }

    pub fn stack(&self) -> &ItemStack {
        &self.stack
    }

    pub fn top_of_stack(&self) -> f64 {
        self.stack.top_of_stack()
    }

    pub fn toggle(&self, toggle: DisplayToggle) -> &Property<bool> {
        match toggle {
            DisplayToggle::Force => &self.show_force,
            DisplayToggle::SumOfForces => &self.show_sum_of_forces,
            DisplayToggle::Values => &self.show_values,
            DisplayToggle::Speed => &self.show_speed,
            DisplayToggle::Masses => &self.show_masses,
            DisplayToggle::Acceleration => &self.show_acceleration,
        }
    }

    pub fn toggle_mut(&mut self, toggle: DisplayToggle) -> &mut Property<bool> {
        match toggle {
            DisplayToggle::Force => &mut self.show_force,
            DisplayToggle::SumOfForces => &mut self.show_sum_of_forces,
            DisplayToggle::Values => &mut self.show_values,
            DisplayToggle::Speed => &mut self.show_speed,
            DisplayToggle::Masses => &mut self.show_masses,
            DisplayToggle::Acceleration => &mut self.show_acceleration,
        }
    }

    pub fn to_state(&self) -> MotionState {
        MotionState {
            kind: self.kind,
            applied_force: self.applied_force.get(),
            friction: self.friction.get(),
            velocity: self.velocity.get(),
            position: self.position.get(),
            pusher_position: self.pusher_position.get(),
            running: self.running.get(),
            display: DisplayState {
                force: self.show_force.get(),
                sum_of_forces: self.show_sum_of_forces.get(),
                values: self.show_values.get(),
                speed: self.show_speed.get(),
                masses: self.show_masses.get(),
                acceleration: self.show_acceleration.get(),
            },
            stack: self.stack.ids().to_vec(),
        }
    }

    /// Check that `state` could be restored into this model.
    pub fn validate(&self, state: &MotionState) -> Result<(), ModelError> {
        if state.kind != self.kind {
            return Err(ModelError::InvalidState(format!(
                "snapshot of {:?} screen restored into {:?} screen",
                state.kind, self.kind
            )));
        }
        for (i, id) in state.stack.iter().enumerate() {
            if id.0 >= self.items.len() {
                return Err(ModelError::UnknownItem(*id));
            }
            if state.stack[..i].contains(id) {
                return Err(ModelError::InvalidState(format!("item {} stacked twice", id.0)));
            }
        }
        Ok(())
    }

    /// Restore a snapshot. Validated up front; on error nothing changes.
    pub fn restore(&mut self, state: &MotionState) -> Result<(), ModelError> {
        self.validate(state)?;
        self.stack.clear(&mut self.items);
        for id in &state.stack {
            self.stack.push(&mut self.items, *id)?;
        }
        self.applied_force.set(state.applied_force);
        self.friction.set(state.friction);
        self.velocity.set(state.velocity);
        self.position.set(state.position);
        self.acceleration.set(state.applied_force / self.config.motion.mass);
        self.pusher_position.set(state.pusher_position);
        self.running.set(state.running);
        self.show_force.set(state.display.force);
        self.show_sum_of_forces.set(state.display.sum_of_forces);
        self.show_values.set(state.display.values);
        self.show_speed.set(state.display.speed);
        self.show_masses.set(state.display.masses);
        self.show_acceleration.set(state.display.acceleration);
        self.refresh_pusher();
        Ok(())
    }

    /// Speed, fall state and pusher placement follow the force and motion.
    fn refresh_pusher(&mut self) {
        let motion = &self.config.motion;
        let speed = self.velocity.get().abs();
        let fallen = speed >= motion.max_speed;
        self.speed.set(speed);
        self.pusher_fallen.set(fallen);
        if fallen {
            return;
        }
        let applied = self.applied_force.get();
        let position = self.position.get();
        if applied > 0.0 {
            self.pusher_position.set(position - motion.pusher_delta - motion.pusher_width);
        } else if applied < 0.0 {
            self.pusher_position.set(position + motion.pusher_delta);
        }
    }
}

impl Screen for MotionModel {
    fn config(&self) -> SimConfig {
        self.config.clone()
    }

    fn apply_config(&mut self, config: SimConfig) {
        *self = MotionModel::with_config(self.kind, config);
    }

    fn handle_input(&mut self, ctx: &mut FrameContext, event: &InputEvent) {
        match *event {
            InputEvent::PusherDrag { dx } => self.drag_pusher(dx),
            InputEvent::PusherRelease => self.release_pusher(),
            InputEvent::SetAppliedForce { value } => {
                let limit = self.config.motion.max_applied_force;
                self.set_applied_force(value.clamp(-limit, limit));
            }
            InputEvent::SetFriction { value } => {
                self.set_friction(value);
            }
            InputEvent::StackItem { item } => {
                if let Err(err) = self.stack_item(item) {
                    log::debug!("stack rejected: {}", err);
                }
            }
            InputEvent::UnstackItem { item } => {
                if let Err(err) = self.unstack_item(item) {
                    log::debug!("unstack rejected: {}", err);
                }
            }
            InputEvent::GoPause => self.toggle_go_pause(),
            InputEvent::Reset => {
                self.reset();
                ctx.emit_event(SimEvent::new(sim_events::RESET, 0.0, 0.0, 0.0));
            }
            InputEvent::Toggle { toggle, on } => {
                self.toggle_mut(toggle).set(on);
            }
            other => log::debug!("{:?} screen ignores {:?}", self.kind, other),
        }
    }

    fn update(&mut self, ctx: &mut FrameContext) {
        if !self.running.get() {
            return;
        }
        self.step();
        ctx.emit_event(SimEvent::new(
            sim_events::MOTION,
            self.velocity.get() as f32,
            self.position.get() as f32,
            self.applied_force.get() as f32,
        ));
    }

    fn reset(&mut self) {
        self.stack.clear(&mut self.items);
        self.applied_force.reset();
        self.friction.reset();
        self.velocity.reset();
        self.position.reset();
        self.speed.reset();
        self.acceleration.reset();
        self.pusher_position.reset();
        self.pusher_fallen.reset();
        self.running.reset();
        for toggle in DisplayToggle::ALL {
            self.toggle_mut(toggle).reset();
        }
    }

    fn state_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(&self.to_state())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn at_rest_step_changes_nothing() {
        let mut model = MotionModel::new(MotionScreenKind::Motion);
        for _ in 0..10 {
            model.step();
        }
        assert_eq!(model.velocity.get(), 0.0);
        assert_eq!(model.position.get(), 0.0);
    }

    #[test]
    fn five_steps_at_one_hundred_newtons() {
        let mut model = MotionModel::new(MotionScreenKind::Motion);
        model.set_applied_force(100.0);
        for _ in 0..5 {
            model.step();
        }
        assert!((model.velocity.get() - 0.5).abs() < EPS);
        assert!((model.position.get() - 1.5).abs() < EPS);
        assert_eq!(model.acceleration.get(), 0.1);
    }

    #[test]
    fn velocity_grows_without_clamp() {
        let mut model = MotionModel::new(MotionScreenKind::Acceleration);
        model.set_applied_force(100.0);
        for _ in 0..10_000 {
            model.step();
        }
        assert!((model.velocity.get() - 1000.0).abs() < 1e-6);
        assert!(model.position.get() > 5.0e6);
        assert!(model.pusher_fallen.get());
    }

    #[test]
    fn pusher_drag_scales_and_clamps() {
        let mut model = MotionModel::new(MotionScreenKind::Motion);
        model.drag_pusher(30.0);
        assert_eq!(model.applied_force.get(), 10.0);
        model.drag_pusher(-900.0);
        assert_eq!(model.applied_force.get(), -100.0);
        model.release_pusher();
        assert_eq!(model.applied_force.get(), 0.0);
    }

    #[test]
    fn pusher_stands_behind_the_stack() {
        let mut model = MotionModel::new(MotionScreenKind::Motion);
        model.set_applied_force(50.0);
        assert_eq!(model.pusher_position.get(), -195.0);
        model.set_applied_force(-50.0);
        assert_eq!(model.pusher_position.get(), 100.0);
        model.set_applied_force(0.0);
        assert_eq!(model.pusher_position.get(), 100.0);
    }

    #[test]
    fn apply_config_rebuilds_without_listeners() {
        let mut model = MotionModel::new(MotionScreenKind::Motion);
        model.velocity.lazy_link(|_, _| {});
        model.set_applied_force(40.0);
        let mut config = SimConfig::default();
        config.motion.mass = 500.0;
        model.apply_config(config);
        assert_eq!(model.velocity.listener_count(), 0);
        assert_eq!(model.applied_force.get(), 0.0);
        model.set_applied_force(100.0);
        model.step();
        assert_eq!(model.velocity.get(), 0.2);
    }

    #[test]
    fn friction_is_fixed_on_motion_screen() {
        let mut motion = MotionModel::new(MotionScreenKind::Motion);
        assert!(!motion.set_friction(0.3));
        assert_eq!(motion.friction.get(), 0.0);

        let mut friction = MotionModel::new(MotionScreenKind::Friction);
        assert!(friction.set_friction(0.3));
        assert_eq!(friction.friction.get(), 0.3);
    }

    #[test]
    fn paused_update_does_not_step() {
        let mut model = MotionModel::new(MotionScreenKind::Motion);
        let mut ctx = FrameContext::default();
        model.set_applied_force(100.0);
        model.handle_input(&mut ctx, &InputEvent::GoPause);
        model.update(&mut ctx);
        assert_eq!(model.velocity.get(), 0.0);
        assert!(ctx.events().is_empty());

        model.handle_input(&mut ctx, &InputEvent::GoPause);
        model.update(&mut ctx);
        assert_eq!(model.velocity.get(), 0.1);
        assert_eq!(ctx.events()[0].kind, sim_events::MOTION);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut model = MotionModel::new(MotionScreenKind::Friction);
        model.set_applied_force(80.0);
        model.set_friction(0.2);
        model.stack_item(ItemId(0)).unwrap();
        model.toggle_mut(DisplayToggle::Masses).set(true);
        model.running.set(false);
        for _ in 0..3 {
            model.step();
        }
        model.reset();
        assert_eq!(model.applied_force.get(), 0.0);
        assert_eq!(model.friction.get(), 0.0);
        assert_eq!(model.velocity.get(), 0.0);
        assert_eq!(model.position.get(), 0.0);
        assert!(model.running.get());
        assert!(model.stack().is_empty());
        assert!(!model.items()[0].is_stacked());
        assert!(model.show_force.get());
        assert!(!model.show_masses.get());
    }

    #[test]
    fn restore_rejects_duplicate_stack_and_changes_nothing() {
        let mut model = MotionModel::new(MotionScreenKind::Motion);
        model.stack_item(ItemId(4)).unwrap();
        let mut state = model.to_state();
        state.velocity = 3.0;
        state.stack = vec![ItemId(1), ItemId(1)];
        assert!(matches!(model.restore(&state), Err(ModelError::InvalidState(_))));
        assert_eq!(model.velocity.get(), 0.0);
        assert_eq!(model.stack().ids(), &[ItemId(4)]);
    }

    #[test]
    fn restore_round_trips_through_json() {
        let mut model = MotionModel::new(MotionScreenKind::Acceleration);
        model.set_applied_force(40.0);
        model.stack_item(ItemId(2)).unwrap();
        model.stack_item(ItemId(0)).unwrap();
        model.step();
        let json = model.state_json().unwrap();

        let mut other = MotionModel::new(MotionScreenKind::Acceleration);
        let state: MotionState = serde_json::from_str(&json).unwrap();
        other.restore(&state).unwrap();
        assert_eq!(other.velocity.get(), model.velocity.get());
        assert_eq!(other.stack().ids(), &[ItemId(2), ItemId(0)]);
        assert_eq!(other.items()[0].stack_index.get(), Some(1));
    }
}
