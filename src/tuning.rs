//! Data-driven match balance
//!
//! Every physics and AI constant that is not tied to a difficulty tier.
//! Defaults reproduce the shipped feel; a JSON document may override any
//! subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::GOAL_HALF_HEIGHT;

/// Errors raised while loading a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ball ===
    /// Fraction of ball velocity retained after one second of rolling
    pub ball_drag: f32,
    /// Speeds below this snap to rest
    pub ball_rest_speed: f32,
    /// Velocity retained (and reflected) when bouncing off a touchline
    pub ball_bounce: f32,
    /// How far behind the goal line the net lets the ball travel
    pub goal_net_depth: f32,

    // === Possession / kicking ===
    /// Ball is pulled back to the carrier once farther than this
    pub dribble_threshold: f32,
    pub dribble_speed: f32,
    pub kick_range: f32,
    pub kick_speed: f32,
    /// Extra random kick speed, uniform in [0, value)
    pub kick_speed_variance: f32,
    pub kick_cooldown_ms: f32,
    /// Loose ball can't be picked up again for this long (ms)
    pub possession_lock_ms: f32,

    // === Contacts ===
    pub defender_contact_range: f32,
    pub keeper_save_range: f32,
    /// Clearance impulse from the clearBall state
    pub clearance_speed: f32,
    pub clearance_speed_variance: f32,
    pub clearance_lateral: f32,

    // === Defender AI ===
    /// Patrol switches straight to a clearance inside this range
    pub patrol_clear_range: f32,
    /// Press/intercept clear the ball inside this range
    pub press_clear_range: f32,
    /// Pressing gives up beyond `engagement_range * disengage_factor`
    pub disengage_factor: f32,
    pub press_timer_ms: f32,
    pub intercept_timer_ms: f32,
    pub post_clear_timer_ms: f32,
    pub intercept_horizon: f32,
    pub intercept_speed_factor: f32,
    /// Minimum ball speed toward goal that triggers an intercept
    pub intercept_trigger_speed: f32,
    /// Offset toward the defended goal when cutting the carrier's lane
    pub lane_bias: f32,
    pub patrol_speed_factor: f32,
    pub patrol_amplitude_x: f32,
    pub patrol_amplitude_y: f32,
    /// Angular frequency of the patrol drift (rad/s)
    pub patrol_frequency: f32,
    /// Steering stops inside this distance of the target
    pub arrive_radius: f32,

    // === Goalkeeper ===
    pub keeper_margin: f32,
    pub keeper_dead_zone: f32,
    pub keeper_prediction_damping: f32,
    pub keeper_min_ball_speed: f32,

    // === Match flow ===
    pub goal_reset_delay: f32,
    pub status_clear_delay: f32,
    pub full_time_grace: f32,
    /// Clock turns critical at or below this many seconds
    pub critical_seconds: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball_drag: 0.85,
            ball_rest_speed: 2.0,
            ball_bounce: 0.5,
            goal_net_depth: 20.0,

            dribble_threshold: 20.0,
            dribble_speed: 260.0,
            kick_range: 60.0,
            kick_speed: 450.0,
            kick_speed_variance: 80.0,
            kick_cooldown_ms: 500.0,
            possession_lock_ms: 300.0,

            defender_contact_range: 25.0,
            keeper_save_range: 30.0,
            clearance_speed: 320.0,
            clearance_speed_variance: 120.0,
            clearance_lateral: 160.0,

            patrol_clear_range: 80.0,
            press_clear_range: 40.0,
            disengage_factor: 1.3,
            press_timer_ms: 1200.0,
            intercept_timer_ms: 900.0,
            post_clear_timer_ms: 700.0,
            intercept_horizon: 0.5,
            intercept_speed_factor: 1.2,
            intercept_trigger_speed: 150.0,
            lane_bias: 30.0,
            patrol_speed_factor: 0.5,
            patrol_amplitude_x: 40.0,
            patrol_amplitude_y: 30.0,
            patrol_frequency: 1.6,
            arrive_radius: 4.0,

            keeper_margin: 5.0,
            keeper_dead_zone: 5.0,
            keeper_prediction_damping: 0.7,
            keeper_min_ball_speed: 40.0,

            goal_reset_delay: 1.0,
            status_clear_delay: 1.5,
            full_time_grace: 2.0,
            critical_seconds: 10,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        let fraction = |field: &'static str, v: f32| {
            if v > 0.0 && v <= 1.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be in (0, 1]",
                })
            }
        };
        let positive = |field: &'static str, v: f32| {
            if v > 0.0 && v.is_finite() {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be positive",
                })
            }
        };
        let non_negative = |field: &'static str, v: f32| {
            if v >= 0.0 && v.is_finite() {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must not be negative",
                })
            }
        };

        fraction("ball_drag", self.ball_drag)?;
        fraction("ball_bounce", self.ball_bounce)?;
        fraction("keeper_prediction_damping", self.keeper_prediction_damping)?;
        positive("dribble_speed", self.dribble_speed)?;
        positive("kick_range", self.kick_range)?;
        positive("kick_speed", self.kick_speed)?;
        positive("clearance_speed", self.clearance_speed)?;
        positive("press_clear_range", self.press_clear_range)?;
        positive("intercept_speed_factor", self.intercept_speed_factor)?;
        non_negative("kick_cooldown_ms", self.kick_cooldown_ms)?;
        non_negative("possession_lock_ms", self.possession_lock_ms)?;
        non_negative("kick_speed_variance", self.kick_speed_variance)?;
        non_negative("clearance_speed_variance", self.clearance_speed_variance)?;
        non_negative("goal_reset_delay", self.goal_reset_delay)?;
        non_negative("full_time_grace", self.full_time_grace)?;
        non_negative("status_clear_delay", self.status_clear_delay)?;
        non_negative("ball_rest_speed", self.ball_rest_speed)?;
        non_negative("goal_net_depth", self.goal_net_depth)?;
        non_negative("dribble_threshold", self.dribble_threshold)?;
        non_negative("defender_contact_range", self.defender_contact_range)?;
        non_negative("keeper_save_range", self.keeper_save_range)?;
        non_negative("patrol_clear_range", self.patrol_clear_range)?;
        non_negative("keeper_dead_zone", self.keeper_dead_zone)?;
        non_negative("arrive_radius", self.arrive_radius)?;

        // Keeper span must stay a non-empty band inside the goal mouth
        if !(self.keeper_margin >= 0.0 && self.keeper_margin < GOAL_HALF_HEIGHT) {
            return Err(TuningError::Invalid {
                field: "keeper_margin",
                reason: "must be in [0, goal half-height)",
            });
        }

        if !(self.disengage_factor >= 1.0 && self.disengage_factor.is_finite()) {
            return Err(TuningError::Invalid {
                field: "disengage_factor",
                reason: "must be at least 1.0 to keep hysteresis",
            });
        }
        Ok(())
    }
}
