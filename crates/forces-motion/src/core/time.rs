/// Fixed timestep accumulator.
/// Converts variable host frame times (seconds) into a whole number of model
/// ticks, so the integrators always advance by their fixed simulated `dt`.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// Host seconds per model tick.
    tick_seconds: f64,
    /// Upper bound on ticks run for a single frame.
    max_ticks: u32,
    /// Host time not yet consumed by a tick.
    accumulator: f64,
}

impl FixedTimestep {
    pub fn new(tick_seconds: f64, max_ticks: u32) -> Self {
        Self {
            tick_seconds,
            max_ticks: max_ticks.max(1),
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of ticks to run.
    pub fn accumulate(&mut self, frame_seconds: f64) -> u32 {
        if !(frame_seconds > 0.0) {
            return 0;
        }
        self.accumulator += frame_seconds;
        // A backgrounded tab can hand us seconds at once; drop the excess.
        self.accumulator = self.accumulator.min(self.tick_seconds * self.max_ticks as f64);
        let ticks = (self.accumulator / self.tick_seconds) as u32;
        self.accumulator -= ticks as f64 * self.tick_seconds;
        ticks
    }

    /// Fraction of the next tick already accumulated (0.0 to 1.0).
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.tick_seconds
    }

    pub fn tick_seconds(&self) -> f64 {
        self.tick_seconds
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
