//! Tug-of-war screen: puller/knot attachment, net force and the game state
//! machine.
//!
//! ```text
//! NotStarted --go (>= 1 puller attached)--> Started --|cart| >= game_length--> GameOver
//!      ^                                      |  ^                               |
//!      |                                  go  v  | go (pause/resume)             |
//!      +----------- reset / return cart ------+--+-------------------------------+
//! ```
//!
//! Attachment is exclusive: a knot is held by at most one puller. Occupancy is
//! not stored on the knot; it is derived from the pullers' knot references, so
//! the two can never disagree.

use glam::DVec2;
use crate::api::config::SimConfig;
use crate::api::screen::{FrameContext, Screen};
use crate::api::types::{sim_events, DisplayToggle, GameState, KnotId, PullerId, Side, SimEvent};
use crate::bridge::state::{NetForceState, PullerState, TugDisplayState};
use crate::components::knot::Knot;
use crate::components::puller::Puller;
use crate::core::property::Property;
use crate::error::ModelError;
use crate::input::queue::InputEvent;

pub struct NetForceModel {
    config: SimConfig,
    knots: Vec<Knot>,
    pullers: Vec<Puller>,
    pub cart_position: Property<f64>,
    /// Cart displacement per unit time during the last tick.
    pub cart_velocity: Property<f64>,
    /// Right-positive sum of attached pullers' forces.
    pub net_force: Property<f64>,
    /// Magnitude of the left team's pull.
    pub left_force: Property<f64>,
    /// Magnitude of the right team's pull.
    pub right_force: Property<f64>,
    pub number_pullers_attached: Property<usize>,
    pub state: Property<GameState>,
    pub running: Property<bool>,
    pub winner: Property<Option<Side>>,
    /// Simulated time since the game started; drives the flag animation.
    pub time: Property<f64>,
    pub show_sum_of_forces: Property<bool>,
    pub show_values: Property<bool>,
    pub show_speed: Property<bool>,
}

impl NetForceModel {
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        let tug = &config.tug_of_war;
        let knots = tug
            .left_knots
            .iter()
            .map(|&x| (Side::Left, x))
            .chain(tug.right_knots.iter().map(|&x| (Side::Right, x)))
            .enumerate()
            .map(|(i, (side, x))| Knot::new(KnotId(i), side, x, tug.knot_y))
            .collect();
        Self {
            knots,
            pullers: Puller::catalog(),
            cart_position: Property::new("cartPosition", 0.0),
            cart_velocity: Property::new("cartVelocity", 0.0),
            net_force: Property::new("netForce", 0.0),
            left_force: Property::new("leftForce", 0.0),
            right_force: Property::new("rightForce", 0.0),
            number_pullers_attached: Property::new("numberPullersAttached", 0),
            state: Property::new("state", GameState::NotStarted),
            running: Property::new("running", false),
            winner: Property::new("winner", None),
            time: Property::new("time", 0.0),
            show_sum_of_forces: Property::new("showSumOfForces", false),
            show_values: Property::new("showValues", false),
            show_speed: Property::new("showSpeed", false),
            config,
        }
    }

    pub fn pullers(&self) -> &[Puller] {
        &self.pullers
    }

    pub fn knots(&self) -> &[Knot] {
        &self.knots
    }

    pub fn puller(&self, id: PullerId) -> Option<&Puller> {
        self.pullers.get(id.0)
    }

    /// Mutable puller access, for linking listeners.
    pub fn puller_mut(&mut self, id: PullerId) -> Option<&mut Puller> {
        self.pullers.get_mut(id.0)
    }

    pub fn knot(&self, id: KnotId) -> Option<&Knot> {
        self.knots.get(id.0)
    }

    pub fn knot_mut(&mut self, id: KnotId) -> Option<&mut Knot> {
        self.knots.get_mut(id.0)
    }

    /// The puller currently holding `knot`, if any.
    pub fn holder_of(&self, knot: KnotId) -> Option<PullerId> {
        self.pullers.iter().find(|p| p.is_attached_to(knot)).map(|p| p.id)
    }

    pub fn count_attached(&self, side: Side) -> usize {
        self.pullers
            .iter()
            .filter(|p| p.is_attached() && p.side == side)
            .count()
    }

    /// Right-positive sum over attached pullers.
    pub fn compute_net_force(&self) -> f64 {
        self.pullers
            .iter()
            .filter(|p| p.is_attached())
            .map(Puller::signed_force)
            .sum()
    }

    /// Attach `puller` to `knot`. Fails without changing anything if the knot
    /// is held by another puller or belongs to the other team. Re-attaching a
    /// puller to its own knot is a successful no-op; attaching an attached
    /// puller to a different free knot moves it.
    pub fn attach(&mut self, puller: PullerId, knot: KnotId) -> Result<(), ModelError> {
        let p = self.pullers.get(puller.0).ok_or(ModelError::UnknownPuller(puller))?;
        let k = self.knots.get(knot.0).ok_or(ModelError::UnknownKnot(knot))?;
        if p.side != k.side {
            return Err(ModelError::SideMismatch { puller: p.side, knot: k.side });
        }
        match self.holder_of(knot) {
            Some(holder) if holder == puller => return Ok(()),
            Some(holder) => return Err(ModelError::KnotOccupied { knot, holder }),
            None => {}
        }

        let position = k.position();
        let p = &mut self.pullers[puller.0];
        p.knot.set(Some(knot));
        p.hover_knot.set(None);
        p.position.set(position);
        log::debug!("puller {} attached to knot {}", puller.0, knot.0);
        self.refresh_forces();
        Ok(())
    }

    /// Detach `puller`, leaving it where its knot last put it. Returns whether
    /// it was attached; detaching a detached puller is a no-op.
    pub fn detach(&mut self, puller: PullerId) -> Result<bool, ModelError> {
        let p = self.pullers.get_mut(puller.0).ok_or(ModelError::UnknownPuller(puller))?;
        if !p.is_attached() {
            return Ok(false);
        }
        p.knot.set(None);
        log::debug!("puller {} detached", puller.0);
        self.refresh_forces();
        Ok(true)
    }

    /// Start of a drag: the puller lets go of its knot.
    pub fn grab(&mut self, puller: PullerId) -> Result<bool, ModelError> {
        let detached = self.detach(puller)?;
        let p = &mut self.pullers[puller.0];
        p.dragging.set(true);
        p.hover_knot.set(None);
        Ok(detached)
    }

    /// Move a dragged puller and recompute the knot a drop would snap to.
    /// Only a grabbed puller moves; an attached one stays on its knot.
    pub fn drag_to(&mut self, puller: PullerId, position: DVec2) -> Result<(), ModelError> {
        let p = self.puller(puller).ok_or(ModelError::UnknownPuller(puller))?;
        if !p.dragging.get() {
            return Err(ModelError::NotDragging(puller));
        }
        let side = p.side;
        let target = self.target_knot(puller, side, position);
        let p = &mut self.pullers[puller.0];
        p.position.set(position);
        p.hover_knot.set(target);
        Ok(())
    }

    /// End of a drag: attach to the hovered knot, or go back to the toolbox.
    /// Returns the knot the puller ended up on.
    pub fn drop_puller(&mut self, puller: PullerId) -> Result<Option<KnotId>, ModelError> {
        let p = self.pullers.get_mut(puller.0).ok_or(ModelError::UnknownPuller(puller))?;
        if !p.dragging.get() {
            return Err(ModelError::NotDragging(puller));
        }
        p.dragging.set(false);
        let hover = p.hover_knot.get();
        p.hover_knot.set(None);
        if let Some(knot) = hover {
            match self.attach(puller, knot) {
                Ok(()) => return Ok(Some(knot)),
                Err(err) => log::debug!("drop fell back to toolbox: {}", err),
            }
        }
        self.return_to_toolbox(puller)?;
        Ok(None)
    }

    /// Detach if needed and put the puller back in its toolbox.
    pub fn return_to_toolbox(&mut self, puller: PullerId) -> Result<(), ModelError> {
        let p = self.pullers.get_mut(puller.0).ok_or(ModelError::UnknownPuller(puller))?;
        let was_attached = p.is_attached();
        p.return_home();
        if was_attached {
            self.refresh_forces();
        }
        Ok(())
    }

    /// The go/pause button. Returns whether anything changed.
    ///
    /// A game only starts with at least one puller on the rope.
    pub fn go_pause(&mut self) -> bool {
        match self.state.get() {
            GameState::NotStarted => {
                if self.number_pullers_attached.get() == 0 {
                    log::info!("go ignored: no pullers on the rope");
                    return false;
                }
                self.state.set(GameState::Started);
                self.running.set(true);
                true
            }
            GameState::Started => {
                let running = self.running.get();
                self.running.set(!running);
                true
            }
            GameState::GameOver => false,
        }
    }

    /// Advance one tick. Only moves the cart while started and running.
    /// Returns the winner if this tick ended the game.
    pub fn step(&mut self) -> Option<Side> {
        if self.state.get() != GameState::Started || !self.running.get() {
            return None;
        }
        let tug = &self.config.tug_of_war;
        let dt = tug.dt;
        let velocity = self.compute_net_force() * tug.cart_gain;
        let cart = self.cart_position.get() + velocity * dt;
        let game_length = tug.game_length;

        self.refresh_forces();
        self.cart_velocity.set(velocity);
        self.cart_position.set(cart);
        self.follow_cart();
        let time = self.time.get() + dt;
        self.time.set(time);

        if cart.abs() >= game_length {
            let winner = if cart < 0.0 { Side::Left } else { Side::Right };
            self.state.set(GameState::GameOver);
            self.running.set(false);
            self.cart_velocity.set(0.0);
            self.winner.set(Some(winner));
            log::info!("game over: {} team wins at cart position {}", winner.team(), cart);
            return Some(winner);
        }
        None
    }

    /// Bring the cart back to the center, keeping pullers on their knots.
    pub fn return_cart(&mut self) {
        self.cart_position.reset();
        self.cart_velocity.reset();
        self.follow_cart();
        self.winner.reset();
        self.running.reset();
        self.time.reset();
        self.state.set(GameState::NotStarted);
    }

    pub fn toggle_mut(&mut self, toggle: DisplayToggle) -> Option<&mut Property<bool>> {
        match toggle {
            DisplayToggle::SumOfForces => Some(&mut self.show_sum_of_forces),
            DisplayToggle::Values => Some(&mut self.show_values),
            DisplayToggle::Speed => Some(&mut self.show_speed),
            _ => None,
        }
    }

    pub fn to_state(&self) -> NetForceState {
        NetForceState {
            cart_position: self.cart_position.get(),
            state: self.state.get(),
            running: self.running.get(),
            winner: self.winner.get(),
            time: self.time.get(),
            display: TugDisplayState {
                sum_of_forces: self.show_sum_of_forces.get(),
                values: self.show_values.get(),
                speed: self.show_speed.get(),
            },
            pullers: self
                .pullers
                .iter()
                .map(|p| PullerState {
                    position: p.position.get(),
                    knot: p.knot.get(),
                })
                .collect(),
        }
    }

    /// Check that `state` could be restored into this model.
    pub fn validate(&self, state: &NetForceState) -> Result<(), ModelError> {
        if state.pullers.len() != self.pullers.len() {
            return Err(ModelError::InvalidState(format!(
                "expected {} pullers, got {}",
                self.pullers.len(),
                state.pullers.len()
            )));
        }
        if (state.state == GameState::GameOver) != state.winner.is_some() {
            return Err(ModelError::InvalidState("winner must be set exactly when the game is over".into()));
        }
        let mut held: Vec<KnotId> = Vec::new();
        for (puller, saved) in self.pullers.iter().zip(&state.pullers) {
            if let Some(knot) = saved.knot {
                let k = self.knots.get(knot.0).ok_or(ModelError::UnknownKnot(knot))?;
                if k.side != puller.side {
                    return Err(ModelError::SideMismatch { puller: puller.side, knot: k.side });
                }
                if held.contains(&knot) {
                    return Err(ModelError::InvalidState(format!("knot {} held twice", knot.0)));
                }
                held.push(knot);
            }
        }
        Ok(())
    }

    /// Restore a snapshot. Validated up front; on error nothing changes.
    pub fn restore(&mut self, state: &NetForceState) -> Result<(), ModelError> {
        self.validate(state)?;
        for (puller, saved) in self.pullers.iter_mut().zip(&state.pullers) {
            puller.dragging.set(false);
            puller.hover_knot.set(None);
            puller.knot.set(saved.knot);
            puller.position.set(saved.position);
        }
        self.cart_position.set(state.cart_position);
        self.cart_velocity.set(0.0);
        self.state.set(state.state);
        self.running.set(state.running && state.state == GameState::Started);
        self.winner.set(state.winner);
        self.time.set(state.time);
        self.show_sum_of_forces.set(state.display.sum_of_forces);
        self.show_values.set(state.display.values);
        self.show_speed.set(state.display.speed);
        self.follow_cart();
        self.refresh_forces();
        Ok(())
    }

    /// Nearest knot on `side` within snap distance not held by someone else.
    fn target_knot(&self, puller: PullerId, side: Side, position: DVec2) -> Option<KnotId> {
        let snap = self.config.tug_of_war.snap_distance;
        self.knots
            .iter()
            .filter(|k| k.side == side)
            .filter(|k| self.holder_of(k.id).map_or(true, |holder| holder == puller))
            .map(|k| (k.id, k.position().distance(position)))
            .filter(|&(_, distance)| distance < snap)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Knots keep their offset from the cart; attached pullers stay on their knots.
    fn follow_cart(&mut self) {
        let cart = self.cart_position.get();
        for knot in self.knots.iter_mut() {
            knot.follow_cart(cart);
        }
        for puller in self.pullers.iter_mut() {
            if let Some(knot) = puller.knot.get() {
                puller.position.set(self.knots[knot.0].position());
            }
        }
    }

    fn refresh_forces(&mut self) {
        let (left, right) = self
            .pullers
            .iter()
            .filter(|p| p.is_attached())
            .fold((0.0, 0.0), |(l, r), p| match p.side {
                Side::Left => (l + p.force(), r),
                Side::Right => (l, r + p.force()),
            });
        let attached = self.pullers.iter().filter(|p| p.is_attached()).count();
        self.left_force.set(left);
        self.right_force.set(right);
        self.net_force.set(right - left);
        self.number_pullers_attached.set(attached);
    }

    fn emit_attachment(ctx: &mut FrameContext, puller: PullerId, knot: Option<KnotId>) {
        let event = match knot {
            Some(knot) => SimEvent::new(sim_events::PULLER_ATTACHED, puller.0 as f32, knot.0 as f32, 0.0),
            None => SimEvent::new(sim_events::PULLER_DETACHED, puller.0 as f32, 0.0, 0.0),
        };
        ctx.emit_event(event);
    }
}

impl Default for NetForceModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for NetForceModel {
    fn config(&self) -> SimConfig {
        self.config.clone()
    }

    fn apply_config(&mut self, config: SimConfig) {
        *self = NetForceModel::with_config(config);
    }

    fn handle_input(&mut self, ctx: &mut FrameContext, event: &InputEvent) {
        let outcome = match *event {
            InputEvent::PullerGrab { puller } => self.grab(puller).map(|detached| {
                if detached {
                    Self::emit_attachment(ctx, puller, None);
                }
            }),
            InputEvent::PullerMove { puller, x, y } => self.drag_to(puller, DVec2::new(x, y)),
            InputEvent::PullerDrop { puller } => self.drop_puller(puller).map(|knot| {
                if knot.is_some() {
                    Self::emit_attachment(ctx, puller, knot);
                }
            }),
            InputEvent::ReturnPuller { puller } => {
                let was_attached = self.puller(puller).is_some_and(Puller::is_attached);
                self.return_to_toolbox(puller).map(|()| {
                    if was_attached {
                        Self::emit_attachment(ctx, puller, None);
                    }
                })
            }
            InputEvent::GoPause => {
                self.go_pause();
                Ok(())
            }
            InputEvent::ReturnCart => {
                self.return_cart();
                ctx.emit_event(SimEvent::new(sim_events::CART_RETURNED, 0.0, 0.0, 0.0));
                Ok(())
            }
            InputEvent::Reset => {
                self.reset();
                ctx.emit_event(SimEvent::new(sim_events::RESET, 0.0, 0.0, 0.0));
                Ok(())
            }
            InputEvent::Toggle { toggle, on } => {
                match self.toggle_mut(toggle) {
                    Some(property) => {
                        property.set(on);
                    }
                    None => log::debug!("tug of war has no {:?} check box", toggle),
                }
                Ok(())
            }
            other => {
                log::debug!("tug of war ignores {:?}", other);
                Ok(())
            }
        };
        if let Err(err) = outcome {
            log::warn!("tug of war input {:?} rejected: {}", event, err);
        }
    }

    fn update(&mut self, ctx: &mut FrameContext) {
        if let Some(winner) = self.step() {
            ctx.emit_event(SimEvent::new(
                sim_events::GAME_OVER,
                winner.sign() as f32,
                self.cart_position.get() as f32,
                0.0,
            ));
        }
        ctx.emit_event(SimEvent::new(
            sim_events::NET_FORCE,
            self.net_force.get() as f32,
            self.cart_position.get() as f32,
            0.0,
        ));
    }

    fn reset(&mut self) {
        for puller in self.pullers.iter_mut() {
            puller.return_home();
        }
        self.cart_position.reset();
        self.cart_velocity.reset();
        self.follow_cart();
        self.refresh_forces();
        self.state.reset();
        self.running.reset();
        self.winner.reset();
        self.time.reset();
        self.show_sum_of_forces.reset();
        self.show_values.reset();
        self.show_speed.reset();
    }

    fn state_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(&self.to_state())?)
    }
}
