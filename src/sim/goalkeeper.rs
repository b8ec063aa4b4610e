//! Goalkeeper AI
//!
//! Moves only along its goal line, inside the goal mouth. Tracks the ball
//! directly, or a damped projection of where it will cross the line when
//! a shot is coming.

use glam::Vec2;

use super::physics::keeper_save;
use super::state::{Body, Match};
use crate::difficulty::DifficultyProfile;
use crate::sim::field::Field;
use crate::tuning::Tuning;

/// Vertical travel limits (top, bottom)
pub fn keeper_span(field: &Field, tuning: &Tuning) -> (f32, f32) {
    (
        field.goal_top() + tuning.keeper_margin,
        field.goal_bottom() - tuning.keeper_margin,
    )
}

/// Target y on the keeper's line
///
/// When the ball is in the keeper's half and heading at the goal with
/// real pace, project its crossing point and scale the lateral travel
/// by `keeper_prediction_damping` so the keeper doesn't overcommit.
pub fn target_y(line_x: f32, ball: &Body, field: &Field, tuning: &Tuning) -> f32 {
    let (top, bottom) = keeper_span(field, tuning);
    let in_half = ball.pos.x > field.width / 2.0;
    let incoming = ball.vel.x > tuning.keeper_min_ball_speed;

    let raw = if in_half && incoming && ball.pos.x < line_x {
        let time_to_line = (line_x - ball.pos.x) / ball.vel.x;
        ball.pos.y + ball.vel.y * time_to_line * tuning.keeper_prediction_damping
    } else {
        ball.pos.y
    };
    raw.clamp(top, bottom)
}

/// Vertical velocity toward `target`, or rest inside the dead zone
pub fn keeper_velocity(
    current_y: f32,
    target: f32,
    profile: &DifficultyProfile,
    tuning: &Tuning,
) -> Vec2 {
    let dy = target - current_y;
    if dy.abs() <= tuning.keeper_dead_zone {
        Vec2::ZERO
    } else {
        Vec2::new(0.0, dy.signum() * profile.keeper_speed)
    }
}

/// Advance the keeper by one tick
///
/// `ball_live` false skips the save check (dead ball after a goal).
pub fn step_keeper(m: &mut Match, dt: f32, ball_live: bool) {
    let target = target_y(m.keeper.line_x, &m.ball, &m.field, &m.tuning);
    m.keeper.body.vel = keeper_velocity(m.keeper.body.pos.y, target, &m.profile, &m.tuning);
    m.keeper.body.integrate(dt);

    let (top, bottom) = keeper_span(&m.field, &m.tuning);
    m.keeper.body.pos.x = m.keeper.line_x;
    m.keeper.body.pos.y = m.keeper.body.pos.y.clamp(top, bottom);

    if ball_live {
        keeper_save(m);
    }
}
