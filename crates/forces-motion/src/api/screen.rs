use crate::api::config::SimConfig;
use crate::api::types::SimEvent;
use crate::error::ModelError;
use crate::input::queue::InputEvent;

/// The contract every screen model fulfills.
///
/// A host calls `handle_input` once per queued event, then `update` once per
/// fixed tick. All mutation happens inside those calls, on one thread.
pub trait Screen {
    /// Current configuration.
    fn config(&self) -> SimConfig {
        SimConfig::default()
    }

    /// Replace the configuration. Rebuilds and resets the model.
    ///
    /// The rebuilt model starts with no listeners: anything linked to its
    /// properties before the call must be linked again afterwards.
    fn apply_config(&mut self, config: SimConfig);

    /// Translate one view event into property writes.
    fn handle_input(&mut self, ctx: &mut FrameContext, event: &InputEvent);

    /// Advance one fixed tick.
    fn update(&mut self, ctx: &mut FrameContext);

    /// Restore the documented initial state.
    fn reset(&mut self);

    /// JSON snapshot of the model state, for the view and for debugging.
    fn state_json(&self) -> Result<String, ModelError>;
}

/// Per-frame output shared with the host.
pub struct FrameContext {
    events: Vec<SimEvent>,
    max_events: usize,
    dropped: usize,
}

impl FrameContext {
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::with_capacity(max_events),
            max_events,
            dropped: 0,
        }
    }

    /// Queue an event for the view. Events beyond `max_events` in one frame
    /// are dropped.
    pub fn emit_event(&mut self, event: SimEvent) {
        if self.events.len() < self.max_events {
            self.events.push(event);
        } else {
            self.dropped += 1;
        }
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        if self.dropped > 0 {
            log::warn!("dropped {} sim events (max {} per frame)", self.dropped, self.max_events);
            self.dropped = 0;
        }
        self.events.clear();
    }

    pub fn set_max_events(&mut self, max_events: usize) {
        self.max_events = max_events;
    }
}

impl Default for FrameContext {
    fn default() -> Self {
        Self::new(SimConfig::default().max_events)
    }
}
