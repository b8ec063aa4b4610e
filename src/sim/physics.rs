//! Ball physics
//!
//! Integration, rolling drag, touchline bounces, dribble attraction, kicks
//! and the impulses defenders and the keeper put on the ball. Only simple
//! circle-distance contacts; no spin, no body-body resolution.

use glam::Vec2;
use rand::Rng;

use super::field::{Field, GoalSide};
use super::state::{Body, GameEvent, Match};
use crate::tuning::Tuning;
use crate::{direction_or, lerp_range};

/// Defender touch: x speed range (away from goal) and lateral half-range
const DEFENDER_TOUCH_X: (f32, f32) = (100.0, 200.0);
const DEFENDER_TOUCH_Y: f32 = 100.0;
/// Keeper save: x speed range (away from goal) and lateral half-range
const KEEPER_SAVE_X: (f32, f32) = (200.0, 300.0);
const KEEPER_SAVE_Y: f32 = 150.0;

/// Exponential rolling drag: retains `drag^dt` of the velocity
///
/// Never amplifies; snaps to rest below `rest_speed`.
pub fn apply_drag(vel: Vec2, drag: f32, rest_speed: f32, dt: f32) -> Vec2 {
    let factor = drag.clamp(0.0, 1.0).powf(dt.max(0.0));
    let damped = vel * factor;
    if damped.length_squared() < rest_speed * rest_speed {
        Vec2::ZERO
    } else {
        damped
    }
}

/// Integrate the ball, then resolve touchlines and the back of the net
///
/// `dribbling` skips drag: the carrier's pull already set the velocity.
pub fn integrate_ball(ball: &mut Body, field: &Field, tuning: &Tuning, dt: f32, dribbling: bool) {
    if !dribbling {
        ball.vel = apply_drag(ball.vel, tuning.ball_drag, tuning.ball_rest_speed, dt);
    }
    ball.integrate(dt);
    bounce_off_bounds(ball, field, tuning);
}

/// Clamp the ball and bounce the velocity off whichever wall it met
pub fn bounce_off_bounds(ball: &mut Body, field: &Field, tuning: &Tuning) {
    let hit = field.clamp_ball(&mut ball.pos, ball.radius, tuning.goal_net_depth);
    if !hit.hit() {
        return;
    }
    // Only components heading into the wall flip
    if hit.normal.x != 0.0 && ball.vel.x * hit.normal.x > 0.0 {
        ball.vel.x = -ball.vel.x * tuning.ball_bounce;
    }
    if hit.normal.y != 0.0 && ball.vel.y * hit.normal.y > 0.0 {
        ball.vel.y = -ball.vel.y * tuning.ball_bounce;
    }
}

/// Knock the ball off the player and lock it out for a moment
pub fn lose_possession(m: &mut Match) {
    m.player.has_ball = false;
    m.state.possession_lock = m.tuning.possession_lock_ms;
}

/// Player picks the ball up on overlap
pub fn update_possession(m: &mut Match) {
    if m.player.has_ball || m.state.possession_lock > 0.0 {
        return;
    }
    let reach = m.player.body.radius + m.ball.radius;
    if m.player.body.distance_to(&m.ball) < reach {
        m.player.has_ball = true;
    }
}

/// Velocity that carries the ball back to `carrier`, if it has drifted
pub fn dribble_velocity(ball: &Body, carrier: &Body, tuning: &Tuning) -> Option<Vec2> {
    let to_carrier = carrier.pos - ball.pos;
    if to_carrier.length() > tuning.dribble_threshold {
        Some(direction_or(to_carrier, Vec2::ZERO) * tuning.dribble_speed)
    } else {
        None
    }
}

/// Apply the dribble pull for this tick; returns true when it overrode drag
pub fn apply_possession(m: &mut Match) -> bool {
    if !m.player.has_ball {
        return false;
    }
    match dribble_velocity(&m.ball, &m.player.body, &m.tuning) {
        Some(vel) => {
            m.ball.vel = vel;
            true
        }
        None => false,
    }
}

/// Player kick; silently ignored out of range or during cooldown
///
/// Returns true when the ball was struck.
pub fn try_kick(m: &mut Match) -> bool {
    if m.state.kick_cooldown > 0.0 {
        return false;
    }
    let delta = m.ball.pos - m.player.body.pos;
    if delta.length() >= m.tuning.kick_range {
        return false;
    }
    // Ball exactly under the player: shoot at the goal we attack
    let dir = direction_or(delta, Vec2::X);
    let speed = m.tuning.kick_speed + m.rng.random::<f32>() * m.tuning.kick_speed_variance;
    m.ball.vel = dir * speed;
    lose_possession(m);
    m.state.kick_cooldown = m.tuning.kick_cooldown_ms;
    m.push_event(GameEvent::Kick { speed });
    log::debug!("Kick at {:.0} u/s", speed);
    true
}

/// Sign of x that points away from `goal`
#[inline]
fn away_sign(goal: GoalSide) -> f32 {
    match goal {
        GoalSide::Right => -1.0,
        GoalSide::Left => 1.0,
    }
}

/// Randomized impulse away from `goal`
fn away_impulse<R: Rng>(rng: &mut R, goal: GoalSide, x_range: (f32, f32), lateral: f32) -> Vec2 {
    let x = lerp_range(x_range.0, x_range.1, rng.random::<f32>());
    let y = (rng.random::<f32>() - 0.5) * 2.0 * lateral;
    Vec2::new(away_sign(goal) * x, y)
}

/// Clearance struck by a defender in the clearBall state
///
/// Always heads away from `goal`; lateral spread is biased to the side
/// the ball is already on.
pub fn clearance_velocity<R: Rng>(
    rng: &mut R,
    tuning: &Tuning,
    field: &Field,
    ball: &Body,
    goal: GoalSide,
) -> Vec2 {
    let speed = tuning.clearance_speed + rng.random::<f32>() * tuning.clearance_speed_variance;
    let side_bias = ((ball.pos.y - field.height / 2.0) / (field.height / 2.0)).clamp(-1.0, 1.0);
    let spread = (rng.random::<f32>() - 0.5) * 2.0 * tuning.clearance_lateral;
    let lateral = spread * 0.5 + side_bias * tuning.clearance_lateral * 0.5;
    Vec2::new(away_sign(goal) * speed, lateral)
}

/// Defender brushes the ball; returns true on contact
pub fn defender_contact(m: &mut Match, idx: usize) -> bool {
    let Some(defender) = m.defenders.get(idx) else {
        return false;
    };
    if defender.body.distance_to(&m.ball) >= m.tuning.defender_contact_range {
        return false;
    }
    let goal = m.defended_goal();
    m.ball.vel = away_impulse(&mut m.rng, goal, DEFENDER_TOUCH_X, DEFENDER_TOUCH_Y);
    lose_possession(m);
    true
}

/// Keeper smothers or parries the ball; returns true on save
pub fn keeper_save(m: &mut Match) -> bool {
    if m.keeper.body.distance_to(&m.ball) >= m.tuning.keeper_save_range {
        return false;
    }
    let goal = m.defended_goal();
    m.ball.vel = away_impulse(&mut m.rng, goal, KEEPER_SAVE_X, KEEPER_SAVE_Y);
    lose_possession(m);
    m.push_event(GameEvent::Save);
    log::debug!("Keeper save");
    true
}
