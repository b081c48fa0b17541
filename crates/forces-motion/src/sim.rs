//! The four-screen simulation: tug of war, motion, friction, acceleration.
//!
//! Each screen keeps its own model for the whole session; switching tabs does
//! not reset anything. Only the active screen receives input and ticks.

use crate::api::config::SimConfig;
use crate::api::screen::{FrameContext, Screen};
use crate::api::types::{sim_events, MotionScreenKind, ScreenId, SimEvent};
use crate::bridge::state::SimState;
use crate::error::ModelError;
use crate::input::queue::InputEvent;
use crate::systems::motion::MotionModel;
use crate::systems::netforce::NetForceModel;

pub struct Sim {
    config: SimConfig,
    active: ScreenId,
    tug_of_war: NetForceModel,
    motion: MotionModel,
    friction: MotionModel,
    acceleration: MotionModel,
}

impl Sim {
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        Self {
            active: ScreenId::default(),
            tug_of_war: NetForceModel::with_config(config.clone()),
            motion: MotionModel::with_config(MotionScreenKind::Motion, config.clone()),
            friction: MotionModel::with_config(MotionScreenKind::Friction, config.clone()),
            acceleration: MotionModel::with_config(MotionScreenKind::Acceleration, config.clone()),
            config,
        }
    }

    pub fn active(&self) -> ScreenId {
        self.active
    }

    /// Returns whether the selection changed.
    pub fn select(&mut self, screen: ScreenId) -> bool {
        if self.active == screen {
            return false;
        }
        log::info!("screen {:?} -> {:?}", self.active, screen);
        self.active = screen;
        true
    }

    pub fn tug_of_war(&self) -> &NetForceModel {
        &self.tug_of_war
    }

    pub fn tug_of_war_mut(&mut self) -> &mut NetForceModel {
        &mut self.tug_of_war
    }

    /// The motion-sandbox model behind `screen`, or `None` for tug of war.
    pub fn motion(&self, screen: ScreenId) -> Option<&MotionModel> {
        match screen {
            ScreenId::TugOfWar => None,
            ScreenId::Motion => Some(&self.motion),
            ScreenId::Friction => Some(&self.friction),
            ScreenId::Acceleration => Some(&self.acceleration),
        }
    }

    pub fn motion_mut(&mut self, screen: ScreenId) -> Option<&mut MotionModel> {
        match screen {
            ScreenId::TugOfWar => None,
            ScreenId::Motion => Some(&mut self.motion),
            ScreenId::Friction => Some(&mut self.friction),
            ScreenId::Acceleration => Some(&mut self.acceleration),
        }
    }

    pub fn to_state(&self) -> SimState {
        SimState {
            active: self.active,
            tug_of_war: self.tug_of_war.to_state(),
            motion: self.motion.to_state(),
            friction: self.friction.to_state(),
            acceleration: self.acceleration.to_state(),
        }
    }

    /// Restore every screen. All four snapshots are validated before any
    /// screen is touched, so on error nothing changes.
    pub fn restore(&mut self, state: &SimState) -> Result<(), ModelError> {
        self.tug_of_war.validate(&state.tug_of_war)?;
        self.motion.validate(&state.motion)?;
        self.friction.validate(&state.friction)?;
        self.acceleration.validate(&state.acceleration)?;

        self.tug_of_war.restore(&state.tug_of_war)?;
        self.motion.restore(&state.motion)?;
        self.friction.restore(&state.friction)?;
        self.acceleration.restore(&state.acceleration)?;
        self.active = state.active;
        Ok(())
    }

    fn active_screen(&mut self) -> &mut dyn Screen {
        match self.active {
            ScreenId::TugOfWar => &mut self.tug_of_war,
            ScreenId::Motion => &mut self.motion,
            ScreenId::Friction => &mut self.friction,
            ScreenId::Acceleration => &mut self.acceleration,
        }
    }
}

impl Default for Sim {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for Sim {
    fn config(&self) -> SimConfig {
        self.config.clone()
    }

    /// Rebuilds every screen; the selected tab survives, linked listeners
    /// do not.
    fn apply_config(&mut self, config: SimConfig) {
        let active = self.active;
        *self = Sim::with_config(config);
        self.active = active;
    }

    fn handle_input(&mut self, ctx: &mut FrameContext, event: &InputEvent) {
        if let InputEvent::SelectScreen { screen } = *event {
            if self.select(screen) {
                ctx.emit_event(SimEvent::new(sim_events::SCREEN_CHANGED, screen.index() as f32, 0.0, 0.0));
            }
            return;
        }
        self.active_screen().handle_input(ctx, event);
    }

    fn update(&mut self, ctx: &mut FrameContext) {
        self.active_screen().update(ctx);
    }

    /// Reset all: every screen, and back to the first tab.
    fn reset(&mut self) {
        self.tug_of_war.reset();
        self.motion.reset();
        self.friction.reset();
        self.acceleration.reset();
        self.active = ScreenId::default();
    }

    fn state_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(&self.to_state())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{KnotId, PullerId};

    #[test]
    fn only_the_active_screen_ticks() {
        let mut sim = Sim::new();
        let mut ctx = FrameContext::default();
        sim.handle_input(&mut ctx, &InputEvent::SelectScreen { screen: ScreenId::Friction });
        sim.handle_input(&mut ctx, &InputEvent::SetAppliedForce { value: 100.0 });
        sim.update(&mut ctx);
        assert_eq!(sim.motion(ScreenId::Friction).unwrap().velocity.get(), 0.1);
        assert_eq!(sim.motion(ScreenId::Motion).unwrap().velocity.get(), 0.0);
        assert_eq!(ctx.events()[0].kind, sim_events::SCREEN_CHANGED);
        assert_eq!(ctx.events()[0].a, 2.0);
    }

    #[test]
    fn switching_tabs_keeps_state() {
        let mut sim = Sim::new();
        let mut ctx = FrameContext::default();
        sim.tug_of_war_mut().attach(PullerId(0), KnotId(0)).unwrap();
        sim.handle_input(&mut ctx, &InputEvent::SelectScreen { screen: ScreenId::Motion });
        sim.handle_input(&mut ctx, &InputEvent::SelectScreen { screen: ScreenId::TugOfWar });
        assert_eq!(sim.tug_of_war().holder_of(KnotId(0)), Some(PullerId(0)));
        assert!(sim.motion(ScreenId::TugOfWar).is_none());
    }

    #[test]
    fn reset_all_returns_to_first_tab() {
        let mut sim = Sim::new();
        sim.select(ScreenId::Acceleration);
        sim.motion_mut(ScreenId::Acceleration).unwrap().set_applied_force(10.0);
        sim.reset();
        assert_eq!(sim.active(), ScreenId::TugOfWar);
        assert_eq!(sim.motion(ScreenId::Acceleration).unwrap().applied_force.get(), 0.0);
    }

    #[test]
    fn rejected_snapshot_leaves_every_screen_alone() {
        let mut source = Sim::new();
        source.select(ScreenId::Acceleration);
        source.tug_of_war_mut().attach(PullerId(5), KnotId(6)).unwrap();
        source.motion_mut(ScreenId::Motion).unwrap().set_applied_force(20.0);
        let mut state = source.to_state();
        // The last screen checked carries a snapshot of the wrong kind.
        state.acceleration.kind = MotionScreenKind::Friction;

        let mut sim = Sim::new();
        let fresh = sim.to_state();
        assert!(matches!(sim.restore(&state), Err(ModelError::InvalidState(_))));
        assert_eq!(sim.to_state(), fresh);
        assert_eq!(sim.tug_of_war().net_force.get(), 0.0);
        assert_eq!(sim.active(), ScreenId::TugOfWar);
    }

    #[test]
    fn whole_sim_snapshot_restores() {
        let mut sim = Sim::new();
        sim.select(ScreenId::Motion);
        sim.tug_of_war_mut().attach(PullerId(5), KnotId(6)).unwrap();
        sim.motion_mut(ScreenId::Motion).unwrap().set_applied_force(20.0);
        let json = sim.state_json().unwrap();

        let mut other = Sim::new();
        other.restore(&serde_json::from_str(&json).unwrap()).unwrap();
        assert_eq!(other.active(), ScreenId::Motion);
        assert_eq!(other.tug_of_war().net_force.get(), 50.0);
        assert_eq!(other.motion(ScreenId::Motion).unwrap().applied_force.get(), 20.0);
    }
}
