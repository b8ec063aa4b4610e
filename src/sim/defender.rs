//! Defender AI
//!
//! Each defender runs an independent finite state machine. One tick is
//! split into a pure `transition(state, observation) -> state'` followed
//! by `action(state')`, so a transition never sees its own side effects.

use glam::Vec2;

use super::physics::{clearance_velocity, defender_contact, lose_possession};
use super::state::{DefenderAgent, DefenderState, GameEvent, Match};
use crate::difficulty::DifficultyProfile;
use crate::direction_or;
use crate::tuning::Tuning;

/// What a defender perceives at the start of its step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub dist_to_ball: f32,
    pub dist_to_player: f32,
    /// Ball velocity component toward the defended goal (units/s)
    pub ball_speed_toward_goal: f32,
    /// State timer has run out
    pub timer_elapsed: bool,
    /// Clearance cooldown has run out
    pub can_clear: bool,
}

/// Outcome of the action phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Move with this velocity
    Steer(Vec2),
    /// Strike the ball away from goal
    Clear,
}

pub fn observe(agent: &DefenderAgent, m: &Match) -> Observation {
    let goal = m.field.goal_center(m.defended_goal());
    let toward_goal = direction_or(goal - m.ball.pos, Vec2::X);
    Observation {
        dist_to_ball: agent.body.distance_to(&m.ball),
        dist_to_player: agent.body.distance_to(&m.player.body),
        ball_speed_toward_goal: m.ball.vel.dot(toward_goal),
        timer_elapsed: agent.state_timer <= 0.0,
        can_clear: agent.clear_cooldown <= 0.0,
    }
}

/// Next state given the current one and what the defender sees
pub fn transition(
    state: DefenderState,
    obs: &Observation,
    profile: &DifficultyProfile,
    tuning: &Tuning,
) -> DefenderState {
    let range = profile.engagement_range;
    let engaged = obs.dist_to_ball < range || obs.dist_to_player < range;
    let wants_intercept =
        profile.intercept_enabled && obs.ball_speed_toward_goal > tuning.intercept_trigger_speed;
    let close = |limit: f32| obs.can_clear && obs.dist_to_ball < limit;

    match state {
        DefenderState::Patrol => {
            if !obs.timer_elapsed {
                DefenderState::Patrol
            } else if close(tuning.patrol_clear_range) {
                DefenderState::ClearBall
            } else if engaged && wants_intercept {
                DefenderState::Intercept
            } else if engaged {
                DefenderState::Press
            } else {
                DefenderState::Patrol
            }
        }
        DefenderState::Press => {
            if close(tuning.press_clear_range) {
                DefenderState::ClearBall
            } else if obs.timer_elapsed && obs.dist_to_ball > range * tuning.disengage_factor {
                DefenderState::Patrol
            } else if obs.timer_elapsed && wants_intercept {
                DefenderState::Intercept
            } else {
                DefenderState::Press
            }
        }
        DefenderState::Intercept => {
            if close(tuning.press_clear_range) {
                DefenderState::ClearBall
            } else if obs.timer_elapsed {
                DefenderState::Press
            } else {
                DefenderState::Intercept
            }
        }
        // One-shot; resolved right after its action
        DefenderState::ClearBall => after_clear(obs, profile),
    }
}

/// Where a defender goes once its clearance is struck
pub fn after_clear(obs: &Observation, profile: &DifficultyProfile) -> DefenderState {
    if obs.dist_to_player < profile.engagement_range {
        DefenderState::Press
    } else {
        DefenderState::Patrol
    }
}

/// Timer armed on entering `state` (ms)
fn entry_timer(state: DefenderState, tuning: &Tuning) -> f32 {
    match state {
        DefenderState::Press => tuning.press_timer_ms,
        DefenderState::Intercept => tuning.intercept_timer_ms,
        DefenderState::Patrol | DefenderState::ClearBall => 0.0,
    }
}

/// Velocity toward `target`, zero once inside `arrive_radius`
fn steer(from: Vec2, target: Vec2, speed: f32, arrive_radius: f32) -> Vec2 {
    let delta = target - from;
    if delta.length() <= arrive_radius {
        Vec2::ZERO
    } else {
        direction_or(delta, Vec2::ZERO) * speed
    }
}

/// Smooth drift point around the home anchor
pub fn patrol_target(agent: &DefenderAgent, elapsed: f32, tuning: &Tuning) -> Vec2 {
    let t = elapsed * tuning.patrol_frequency + agent.patrol_phase;
    agent.home
        + Vec2::new(
            t.sin() * tuning.patrol_amplitude_x,
            (t * 0.7).sin() * tuning.patrol_amplitude_y,
        )
}

/// Movement (or clearance) for the state the defender is now in
pub fn action(agent: &DefenderAgent, m: &Match) -> Action {
    let tuning = &m.tuning;
    let profile = &m.profile;
    match agent.state {
        DefenderState::Patrol => Action::Steer(steer(
            agent.body.pos,
            patrol_target(agent, m.elapsed, tuning),
            profile.defender_speed * tuning.patrol_speed_factor,
            tuning.arrive_radius,
        )),
        DefenderState::Press => {
            let predicted = m.ball.pos + m.ball.vel * profile.press_horizon;
            // Carrier on the ball: step into the lane toward goal
            let target = if m.player.has_ball {
                let goal = m.field.goal_center(m.defended_goal());
                predicted + direction_or(goal - predicted, Vec2::X) * tuning.lane_bias
            } else {
                predicted
            };
            Action::Steer(steer(
                agent.body.pos,
                target,
                profile.defender_speed,
                tuning.arrive_radius,
            ))
        }
        DefenderState::Intercept => {
            let predicted = m.ball.pos + m.ball.vel * tuning.intercept_horizon;
            Action::Steer(steer(
                agent.body.pos,
                predicted,
                profile.defender_speed * tuning.intercept_speed_factor,
                tuning.arrive_radius,
            ))
        }
        DefenderState::ClearBall => Action::Clear,
    }
}

/// Advance defender `idx` by one tick
pub fn step_defender(m: &mut Match, idx: usize, dt: f32) {
    let dt_ms = dt * 1000.0;
    let Some(agent) = m.defenders.get_mut(idx) else {
        return;
    };
    agent.state_timer = (agent.state_timer - dt_ms).max(0.0);
    agent.clear_cooldown = (agent.clear_cooldown - dt_ms).max(0.0);

    let obs = observe(&m.defenders[idx], m);
    let current = m.defenders[idx].state;
    let next = transition(current, &obs, &m.profile, &m.tuning);
    if next != current {
        let agent = &mut m.defenders[idx];
        agent.state = next;
        agent.state_timer = entry_timer(next, &m.tuning);
        log::debug!("Defender {} {:?} -> {:?}", idx, current, next);
    }

    let mut cleared = false;
    match action(&m.defenders[idx], m) {
        Action::Steer(vel) => m.defenders[idx].body.vel = vel,
        Action::Clear => {
            let goal = m.defended_goal();
            m.ball.vel = clearance_velocity(&mut m.rng, &m.tuning, &m.field, &m.ball, goal);
            lose_possession(m);
            m.push_event(GameEvent::Clearance { defender: idx });

            let resolved = after_clear(&obs, &m.profile);
            let agent = &mut m.defenders[idx];
            agent.body.vel = Vec2::ZERO;
            agent.state = resolved;
            agent.state_timer = m.tuning.post_clear_timer_ms;
            agent.clear_cooldown = m.tuning.post_clear_timer_ms;
            cleared = true;
            log::debug!("Defender {} cleared, now {:?}", idx, resolved);
        }
    }

    let agent = &mut m.defenders[idx];
    agent.body.integrate(dt);
    m.field.clamp_body(&mut agent.body.pos, agent.body.radius);

    // Incidental touch, only when the ball is running into the defender
    if !cleared && m.defenders[idx].clear_cooldown <= 0.0 {
        let agent = &m.defenders[idx];
        let approaching = m.ball.vel.dot(agent.body.pos - m.ball.pos) > 0.0;
        let resting = m.ball.vel == Vec2::ZERO;
        if approaching || resting {
            defender_contact(m, idx);
        }
    }
}

/// Dead ball: jog back toward the home anchor and forget any pursuit
pub fn return_home(m: &mut Match, idx: usize, dt: f32) {
    let Some(agent) = m.defenders.get_mut(idx) else {
        return;
    };
    agent.state = DefenderState::Patrol;
    agent.state_timer = 0.0;
    agent.body.vel = steer(
        agent.body.pos,
        agent.home,
        m.profile.defender_speed * m.tuning.patrol_speed_factor,
        m.tuning.arrive_radius,
    );
    agent.body.integrate(dt);
    m.field.clamp_body(&mut agent.body.pos, agent.body.radius);
}
