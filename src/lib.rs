//! Kickoff - a top-down football mini-game
//!
//! Core modules:
//! - `sim`: Deterministic match simulation (physics, defender/keeper AI, goals, clock)
//! - `session`: Live match driven by a host frame callback
//! - `difficulty`: Per-tier constants chosen before kickoff
//! - `tuning`: Data-driven physics/AI balance
//! - `result`: Final result and XP reward for the progression layer

pub mod difficulty;
pub mod result;
pub mod session;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use difficulty::{Difficulty, DifficultyProfile};
pub use result::{MatchResult, Outcome};
pub use session::{MatchListener, MatchSession};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted from the host (tab switches etc.)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Pitch dimensions (field-local units, origin top-left, y down)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 500.0;
    /// Half the vertical opening of each goal mouth
    pub const GOAL_HALF_HEIGHT: f32 = 55.0;
    /// Touchline inset used by the pitch markings
    pub const TOUCHLINE_MARGIN: f32 = 30.0;

    /// Entity collision radii
    pub const BALL_RADIUS: f32 = 10.0;
    pub const PLAYER_RADIUS: f32 = 16.0;
    pub const DEFENDER_RADIUS: f32 = 14.0;
    pub const KEEPER_RADIUS: f32 = 16.0;

    /// Player kickoff spot
    pub const PLAYER_START_X: f32 = 150.0;
    /// Goalkeeper line, measured from the right edge
    pub const KEEPER_LINE_OFFSET: f32 = 50.0;
}

/// Unit vector from `delta`, or `fallback` when `delta` has no usable length
///
/// Guards every normalization whose inputs can coincide (ball sitting exactly
/// on a player, etc.) so NaN never reaches a velocity.
#[inline]
pub fn direction_or(delta: Vec2, fallback: Vec2) -> Vec2 {
    let len_sq = delta.length_squared();
    if len_sq > 1e-8 && len_sq.is_finite() {
        delta / len_sq.sqrt()
    } else {
        fallback
    }
}

/// Linearly map `t` in [0, 1) onto `[lo, hi)`
#[inline]
pub fn lerp_range(lo: f32, hi: f32, t: f32) -> f32 {
    lo + (hi - lo) * t
}
