use forces_motion::{
    FixedTimestep, FrameContext, InputEvent, InputQueue, ModelError, Screen, SimConfig, SimEvent,
};

/// Generic screen runner that wires up the frame loop.
///
/// Each exported simulation creates a `thread_local!` ScreenRunner and exports
/// free functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct ScreenRunner<S: Screen> {
    screen: S,
    ctx: FrameContext,
    input: InputQueue,
    timestep: FixedTimestep,
    initialized: bool,
}

impl<S: Screen> ScreenRunner<S> {
    pub fn new(screen: S) -> Self {
        let config = screen.config();
        Self {
            screen,
            ctx: FrameContext::new(config.max_events),
            input: InputQueue::new(),
            timestep: Self::timestep_for(&config),
            initialized: false,
        }
    }

    /// Call once after construction.
    pub fn init(&mut self) {
        self.initialized = true;
    }

    /// Replace the configuration from JSON. The screen is rebuilt, which
    /// drops its listeners. An unparsable or out-of-range config is rejected
    /// and the current one stays in effect.
    pub fn load_config(&mut self, json: &str) -> Result<(), ModelError> {
        let config = SimConfig::from_json(json)?;
        self.ctx.set_max_events(config.max_events);
        self.timestep = Self::timestep_for(&config);
        self.screen.apply_config(config);
        Ok(())
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Decode and queue a `(kind, a, b, c)` event. Unknown events are dropped.
    pub fn push_custom(&mut self, kind: u32, a: f64, b: f64, c: f64) {
        match InputEvent::from_custom(kind, a, b, c) {
            Some(event) => self.input.push(event),
            None => log::warn!("dropped undecodable input kind={} a={} b={} c={}", kind, a, b, c),
        }
    }

    /// Run one host frame: apply queued input once, then run as many fixed
    /// ticks as the elapsed time calls for.
    pub fn tick(&mut self, frame_seconds: f64) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        for event in self.input.drain() {
            self.screen.handle_input(&mut self.ctx, &event);
        }

        let ticks = self.timestep.accumulate(frame_seconds);
        for _ in 0..ticks {
            self.screen.update(&mut self.ctx);
        }
    }

    pub fn reset(&mut self) {
        self.screen.reset();
        self.timestep.reset();
        self.input.drain();
    }

    pub fn state_json(&self) -> Result<String, ModelError> {
        self.screen.state_json()
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut S {
        &mut self.screen
    }

    pub fn events(&self) -> &[SimEvent] {
        self.ctx.events()
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn sim_events_ptr(&self) -> *const f32 {
        let floats: &[f32] = bytemuck::cast_slice(self.ctx.events());
        floats.as_ptr()
    }

    pub fn sim_events_len(&self) -> u32 {
        self.ctx.events().len() as u32
    }

    fn timestep_for(config: &SimConfig) -> FixedTimestep {
        FixedTimestep::new(config.tick_seconds, config.max_ticks_per_frame)
    }
}
