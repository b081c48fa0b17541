use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Configuration for the whole simulation.
/// Every field has a default; a JSON override only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Host seconds per model tick (default: 1/60, one tick per animation frame).
    pub tick_seconds: f64,
    /// Maximum ticks run for a single host frame (default: 10).
    pub max_ticks_per_frame: u32,
    /// Maximum sim events buffered per frame (default: 32).
    pub max_events: usize,
    pub motion: MotionConfig,
    pub tug_of_war: TugOfWarConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 1.0 / 60.0,
            max_ticks_per_frame: 10,
            max_events: 32,
            motion: MotionConfig::default(),
            tug_of_war: TugOfWarConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a config from a JSON string. Missing fields keep
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the models cannot run with.
    pub fn validate(&self) -> Result<(), ModelError> {
        positive("tick_seconds", self.tick_seconds)?;
        if self.max_ticks_per_frame == 0 {
            return Err(ModelError::InvalidConfig {
                field: "max_ticks_per_frame",
                reason: "must be at least 1",
            });
        }

        let motion = &self.motion;
        positive("motion.mass", motion.mass)?;
        positive("motion.dt", motion.dt)?;
        positive("motion.pusher_drag_divisor", motion.pusher_drag_divisor)?;
        non_negative("motion.max_applied_force", motion.max_applied_force)?;
        non_negative("motion.max_speed", motion.max_speed)?;
        for (field, value) in [
            ("motion.stack_baseline", motion.stack_baseline),
            ("motion.stack_spacing", motion.stack_spacing),
            ("motion.stack_center_x", motion.stack_center_x),
            ("motion.pusher_delta", motion.pusher_delta),
            ("motion.pusher_width", motion.pusher_width),
        ] {
            finite(field, value)?;
        }

        let tug = &self.tug_of_war;
        positive("tug_of_war.dt", tug.dt)?;
        positive("tug_of_war.game_length", tug.game_length)?;
        non_negative("tug_of_war.snap_distance", tug.snap_distance)?;
        finite("tug_of_war.cart_gain", tug.cart_gain)?;
        finite("tug_of_war.knot_y", tug.knot_y)?;
        for &x in tug.left_knots.iter().chain(&tug.right_knots) {
            finite("tug_of_war knot x", x)?;
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ModelError::InvalidConfig { field, reason: "must be finite" })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ModelError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidConfig { field, reason: "must be positive" })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ModelError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidConfig { field, reason: "must not be negative" })
    }
}

/// Motion, friction and acceleration screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Mass used by the integrator (default: 1000).
    pub mass: f64,
    /// Simulated time per tick (default: 1).
    pub dt: f64,
    /// y of stack index 0 (default: 350).
    pub stack_baseline: f64,
    /// Vertical distance between stacked items (default: 100).
    pub stack_spacing: f64,
    /// x at which stacked items are centered (default: 490).
    pub stack_center_x: f64,
    /// Applied force limit for pusher drags and the force control (default: 100).
    pub max_applied_force: f64,
    /// Horizontal drag pixels per unit of applied force (default: 3).
    pub pusher_drag_divisor: f64,
    /// Speed at which the pusher can no longer keep up and falls (default: 20).
    pub max_speed: f64,
    /// Gap between the pusher and the center of the stack (default: 100).
    pub pusher_delta: f64,
    /// Width of the pusher figure (default: 95).
    pub pusher_width: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            mass: 1000.0,
            dt: 1.0,
            stack_baseline: 350.0,
            stack_spacing: 100.0,
            stack_center_x: 490.0,
            max_applied_force: 100.0,
            pusher_drag_divisor: 3.0,
            max_speed: 20.0,
            pusher_delta: 100.0,
            pusher_width: 95.0,
        }
    }
}

/// Tug-of-war screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TugOfWarConfig {
    /// Simulated time per tick (default: 1).
    pub dt: f64,
    /// Cart displacement per unit net force per unit time (default: 0.01).
    pub cart_gain: f64,
    /// |cart position| at which the game ends (default: 160).
    pub game_length: f64,
    /// Maximum distance from a dragged puller to a knot it can snap to (default: 80).
    pub snap_distance: f64,
    /// Rope height (default: 285).
    pub knot_y: f64,
    /// Initial x of each left (blue) knot.
    pub left_knots: Vec<f64>,
    /// Initial x of each right (red) knot.
    pub right_knots: Vec<f64>,
}

impl Default for TugOfWarConfig {
    fn default() -> Self {
        Self {
            dt: 1.0,
            cart_gain: 0.01,
            game_length: 160.0,
            snap_distance: 80.0,
            knot_y: 285.0,
            left_knots: vec![62.0, 142.0, 222.0, 302.0],
            right_knots: vec![680.0, 760.0, 840.0, 920.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_partial_override() {
        let json = r#"{
            "tick_seconds": 0.02,
            "motion": { "mass": 500.0 },
            "tug_of_war": { "game_length": 100.0, "right_knots": [700.0] }
        }"#;
        let config = SimConfig::from_json(json).unwrap();
        assert_eq!(config.tick_seconds, 0.02);
        assert_eq!(config.motion.mass, 500.0);
        assert_eq!(config.motion.dt, 1.0);
        assert_eq!(config.tug_of_war.game_length, 100.0);
        assert_eq!(config.tug_of_war.right_knots, vec![700.0]);
        assert_eq!(config.tug_of_war.left_knots.len(), 4);
    }

    #[test]
    fn empty_object_is_default() {
        let config = SimConfig::from_json("{}").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            SimConfig::from_json("{ \"motion\": 3 }"),
            Err(ModelError::Json(_))
        ));
    }

    #[test]
    fn default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let cases = [
            (r#"{ "tick_seconds": -1.0 }"#, "tick_seconds"),
            (r#"{ "tick_seconds": 0.0 }"#, "tick_seconds"),
            (r#"{ "max_ticks_per_frame": 0 }"#, "max_ticks_per_frame"),
            (r#"{ "motion": { "mass": 0.0 } }"#, "motion.mass"),
            (r#"{ "motion": { "dt": -1.0 } }"#, "motion.dt"),
            (r#"{ "tug_of_war": { "game_length": 0.0 } }"#, "tug_of_war.game_length"),
            (r#"{ "tug_of_war": { "snap_distance": -5.0 } }"#, "tug_of_war.snap_distance"),
        ];
        for (json, expected) in cases {
            match SimConfig::from_json(json) {
                Err(ModelError::InvalidConfig { field, .. }) => assert_eq!(field, expected, "{}", json),
                other => panic!("{} accepted: {:?}", json, other),
            }
        }
    }
}
