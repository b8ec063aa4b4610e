//! Match director
//!
//! `tick` advances the physics/AI by one fixed step. The one-second match
//! clock (`clock_second`) and the delayed actions (`apply_deferred`) are
//! driven separately by the host; their relative order within one frame is
//! not guaranteed.

use super::defender::{return_home, step_defender};
use super::field::GoalSide;
use super::goalkeeper::step_keeper;
use super::input::Intent;
use super::physics::{apply_possession, integrate_ball, lose_possession, try_kick, update_possession};
use super::schedule::{self, DeferredAction};
use super::state::{GameEvent, Match, MatchPhase, Side, StatusBanner};

/// Advance the match by one fixed timestep
pub fn tick(m: &mut Match, intent: &Intent, dt: f32) {
    // Physics stops at full time
    if !m.state.is_active() {
        return;
    }

    m.time_ticks += 1;
    m.elapsed += dt;

    // Decay goal flash (cosmetic)
    m.state.goal_flash *= 0.95;
    if m.state.goal_flash < 0.01 {
        m.state.goal_flash = 0.0;
    }

    let live = m.state.ball_in_play();

    // 1. Player velocity from input
    m.player.body.vel = intent.movement * m.profile.player_speed;
    m.player.body.integrate(dt);
    m.field
        .clamp_body(&mut m.player.body.pos, m.player.body.radius);

    // 2. Kick
    if live && intent.kick {
        try_kick(m);
    }

    // 3. Cooldowns
    let dt_ms = dt * 1000.0;
    m.state.kick_cooldown = (m.state.kick_cooldown - dt_ms).max(0.0);
    m.state.possession_lock = (m.state.possession_lock - dt_ms).max(0.0);

    // 4. Possession
    let dribbling = if live {
        update_possession(m);
        apply_possession(m)
    } else {
        false
    };

    // 5. Defenders, then the keeper
    for idx in 0..m.defenders.len() {
        if live {
            step_defender(m, idx, dt);
        } else {
            return_home(m, idx, dt);
        }
    }
    step_keeper(m, dt, live);

    if !live {
        return;
    }

    // 6. Ball
    integrate_ball(&mut m.ball, &m.field, &m.tuning, dt, dribbling);

    // 7. Goals
    if let Some(side) = m.field.goal_crossed(m.ball.pos) {
        score_goal(m, side);
    }
}

/// Credit a goal for the ball crossing `side`'s line
pub fn score_goal(m: &mut Match, side: GoalSide) {
    let (scorer, banner) = match side {
        GoalSide::Right => {
            m.state.player_goals += 1;
            (Side::Player, StatusBanner::Goal)
        }
        GoalSide::Left => {
            m.state.opponent_goals += 1;
            (Side::Opponent, StatusBanner::OpponentGoal)
        }
    };

    // Dead ball until kickoff
    m.state.phase = MatchPhase::Celebrating;
    m.ball.vel = glam::Vec2::ZERO;
    lose_possession(m);
    m.state.status = Some(banner);
    m.state.goal_flash = 1.0;

    schedule::cancel(&mut m.pending, DeferredAction::ClearStatus);
    schedule::schedule(
        &mut m.pending,
        DeferredAction::KickoffReset,
        m.tuning.goal_reset_delay,
    );
    schedule::schedule(
        &mut m.pending,
        DeferredAction::ClearStatus,
        m.tuning.status_clear_delay,
    );

    let (player_goals, opponent_goals) = (m.state.player_goals, m.state.opponent_goals);
    m.push_event(GameEvent::GoalScored {
        scorer,
        player_goals,
        opponent_goals,
    });
    log::info!(
        "{} - score {}-{}",
        banner.text(),
        player_goals,
        opponent_goals
    );
}

/// One second of match clock; returns true when this second blew full time
pub fn clock_second(m: &mut Match) -> bool {
    if !m.state.is_active() {
        return false;
    }
    m.state.time_remaining = m.state.time_remaining.saturating_sub(1);
    if m.state.time_remaining > 0 {
        return false;
    }

    m.state.phase = MatchPhase::FullTime;
    m.state.status = Some(StatusBanner::FullTime);
    m.player.body.vel = glam::Vec2::ZERO;
    schedule::cancel(&mut m.pending, DeferredAction::ClearStatus);
    schedule::schedule(
        &mut m.pending,
        DeferredAction::EmitFinalResult,
        m.tuning.full_time_grace,
    );

    let (player_goals, opponent_goals) = (m.state.player_goals, m.state.opponent_goals);
    m.push_event(GameEvent::FullTime {
        player_goals,
        opponent_goals,
    });
    log::info!("Full time: {}-{}", player_goals, opponent_goals);
    true
}

/// Whether the clock is in its final seconds
pub fn clock_critical(m: &Match) -> bool {
    m.state.time_remaining <= m.tuning.critical_seconds
}

/// Perform a delayed action that has come due
pub fn apply_deferred(m: &mut Match, action: DeferredAction) {
    match action {
        DeferredAction::KickoffReset => {
            m.reset_positions();
            if m.state.phase == MatchPhase::Celebrating {
                m.state.phase = MatchPhase::Playing;
            }
        }
        DeferredAction::ClearStatus => {
            if m.state.status != Some(StatusBanner::FullTime) {
                m.state.status = None;
            }
        }
        DeferredAction::EmitFinalResult => {
            if m.state.phase != MatchPhase::FullTime {
                return;
            }
            m.state.phase = MatchPhase::Ended;
            m.push_event(GameEvent::GameEnd {
                player_goals: m.state.player_goals,
                opponent_goals: m.state.opponent_goals,
            });
        }
    }
}

/// Advance the match-scoped timers by `dt` and apply whatever came due
pub fn advance_deferred(m: &mut Match, dt: f32) {
    for action in schedule::advance(&mut m.pending, dt) {
        apply_deferred(m, action);
    }
}

/// Stop everything; safe to call more than once
pub fn teardown(m: &mut Match) {
    if m.state.phase == MatchPhase::Ended && m.pending.is_empty() {
        return;
    }
    m.state.phase = MatchPhase::Ended;
    m.pending.clear();
    m.events.clear();
    log::info!("Match torn down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::difficulty::Difficulty;
    use crate::sim::state::DefenderState;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    fn new_match(difficulty: Difficulty, seed: u64) -> Match {
        Match::new(difficulty.profile(), Tuning::default(), seed)
    }

    #[test]
    fn test_ball_on_goal_line_scores_once() {
        let mut m = new_match(Difficulty::Medium, 1);
        m.ball.pos = Vec2::new(m.field.width, m.field.height / 2.0);
        m.ball.vel = Vec2::ZERO;

        tick(&mut m, &Intent::default(), SIM_DT);
        let goals: Vec<_> = m
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GoalScored { .. }))
            .collect();
        assert_eq!(
            goals,
            vec![GameEvent::GoalScored {
                scorer: Side::Player,
                player_goals: 1,
                opponent_goals: 0
            }]
        );
        assert_eq!(m.state.phase, MatchPhase::Celebrating);

        // Dead ball: no double count while waiting for kickoff
        for _ in 0..30 {
            tick(&mut m, &Intent::default(), SIM_DT);
        }
        assert_eq!(m.state.player_goals, 1);

        let delay = m.tuning.goal_reset_delay;
        advance_deferred(&mut m, delay);
        assert_eq!(m.ball.pos, m.field.center());
        assert_eq!(m.ball.vel, Vec2::ZERO);
        assert_eq!(m.state.phase, MatchPhase::Playing);
    }

    #[test]
    fn test_opponent_goal_on_left_line() {
        let mut m = new_match(Difficulty::Easy, 2);
        m.ball.pos = Vec2::new(4.0, 240.0);
        m.ball.vel = Vec2::new(-400.0, 0.0);
        tick(&mut m, &Intent::default(), SIM_DT);
        assert_eq!(m.state.opponent_goals, 1);
        assert_eq!(m.state.player_goals, 0);
        assert_eq!(m.state.status, Some(StatusBanner::OpponentGoal));
    }

    #[test]
    fn test_status_clears_after_delay() {
        let mut m = new_match(Difficulty::Easy, 2);
        score_goal(&mut m, GoalSide::Right);
        advance_deferred(&mut m, 1.0);
        assert_eq!(m.state.status, Some(StatusBanner::Goal));
        advance_deferred(&mut m, 0.5);
        assert_eq!(m.state.status, None);
    }

    #[test]
    fn test_full_time_after_duration_without_goals() {
        let mut m = new_match(Difficulty::Hard, 3);
        assert_eq!(m.state.time_remaining, 90);
        for second in 1..=90 {
            let blew = clock_second(&mut m);
            assert_eq!(blew, second == 90);
        }
        assert!(!m.state.is_active());
        assert_eq!(m.state.phase, MatchPhase::FullTime);

        // Extra clock callbacks after full time do nothing
        assert!(!clock_second(&mut m));

        advance_deferred(&mut m, 1.0);
        assert!(!m.events.iter().any(|e| matches!(e, GameEvent::GameEnd { .. })));
        advance_deferred(&mut m, 1.0);
        advance_deferred(&mut m, 5.0);
        let ends: Vec<_> = m
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameEnd { .. }))
            .collect();
        assert_eq!(
            ends,
            vec![&GameEvent::GameEnd {
                player_goals: 0,
                opponent_goals: 0
            }]
        );
        assert_eq!(m.state.phase, MatchPhase::Ended);
    }

    #[test]
    fn test_physics_stops_at_full_time() {
        let mut m = new_match(Difficulty::Easy, 4);
        m.state.time_remaining = 1;
        clock_second(&mut m);
        m.ball.vel = Vec2::new(300.0, 0.0);
        let before = m.ball.pos;
        tick(&mut m, &Intent::default(), SIM_DT);
        assert_eq!(m.ball.pos, before);
    }

    #[test]
    fn test_teardown_cancels_pending_and_is_idempotent() {
        let mut m = new_match(Difficulty::Easy, 5);
        m.state.time_remaining = 1;
        clock_second(&mut m);
        teardown(&mut m);
        teardown(&mut m);
        advance_deferred(&mut m, 10.0);
        assert!(m.events.is_empty());
        assert_eq!(m.state.phase, MatchPhase::Ended);
    }

    #[test]
    fn test_clock_critical() {
        let mut m = new_match(Difficulty::Easy, 6);
        assert!(!clock_critical(&m));
        m.state.time_remaining = 10;
        assert!(clock_critical(&m));
    }

    #[test]
    fn test_far_defender_keeps_patrolling() {
        let mut m = new_match(Difficulty::Hard, 8);
        // Single defender anchored at (400, 150)
        m.defenders.truncate(1);
        m.defenders[0].home = Vec2::new(400.0, 150.0);
        m.defenders[0].body.pos = Vec2::new(400.0, 150.0);

        for i in 0..60 * 30 {
            // Ball 500 away, player 600 away, both pinned
            m.ball.pos = Vec2::new(400.0, 150.0) + Vec2::new(300.0, 400.0);
            m.ball.vel = Vec2::ZERO;
            m.player.body.pos = Vec2::new(400.0, 150.0) + Vec2::new(-360.0, 480.0);
            m.elapsed = i as f32 * SIM_DT;
            step_defender(&mut m, 0, SIM_DT);
            assert_eq!(m.defenders[0].state, DefenderState::Patrol);
        }
    }

    #[test]
    fn test_dribble_carries_ball() {
        let mut m = new_match(Difficulty::Easy, 9);
        // Keep defenders out of the way
        m.defenders.clear();
        m.ball.pos = m.player.body.pos + Vec2::new(10.0, 0.0);
        let run = Intent {
            movement: Vec2::new(0.0, -1.0),
            kick: false,
        };
        for _ in 0..60 {
            tick(&mut m, &run, SIM_DT);
        }
        assert!(m.player.has_ball);
        assert!(m.ball.pos.distance(m.player.body.pos) < 40.0);
    }

    #[test]
    fn test_kick_rate_limited_across_ticks() {
        let mut m = new_match(Difficulty::Easy, 10);
        m.defenders.clear();
        m.ball.pos = m.player.body.pos + Vec2::new(20.0, 0.0);
        let kick = Intent {
            movement: Vec2::ZERO,
            kick: true,
        };
        tick(&mut m, &kick, SIM_DT);
        // Chase the ball and ask again immediately
        m.player.body.pos = m.ball.pos - Vec2::new(20.0, 0.0);
        tick(&mut m, &kick, SIM_DT);
        let kicks = m
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Kick { .. }))
            .count();
        assert_eq!(kicks, 1);
    }

    #[test]
    fn test_determinism() {
        let mut a = new_match(Difficulty::Hard, 99999);
        let mut b = new_match(Difficulty::Hard, 99999);
        let inputs = [
            Intent {
                movement: Vec2::new(1.0, 0.0),
                kick: false,
            },
            Intent {
                movement: Vec2::new(1.0, 0.2),
                kick: true,
            },
            Intent::default(),
        ];
        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut a, input, SIM_DT);
            tick(&mut b, input, SIM_DT);
        }
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(a.player.body.pos, b.player.body.pos);
        assert_eq!(a.events, b.events);
    }

    fn intent_strategy() -> impl Strategy<Value = Intent> {
        (-1.0f32..=1.0, -1.0f32..=1.0, any::<bool>()).prop_map(|(x, y, kick)| Intent {
            movement: Vec2::new(x, y).clamp_length_max(1.0),
            kick,
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_scores_monotonic_and_step_by_one(
            seed in any::<u64>(),
            inputs in prop::collection::vec(intent_strategy(), 1..400),
        ) {
            let mut m = new_match(Difficulty::Hard, seed);
            let mut last = (0u32, 0u32);
            for (i, input) in inputs.iter().enumerate() {
                tick(&mut m, input, SIM_DT);
                if i % 30 == 0 {
                    advance_deferred(&mut m, 0.5);
                }
                let now = (m.state.player_goals, m.state.opponent_goals);
                prop_assert!(now.0 >= last.0 && now.1 >= last.1);
                prop_assert!((now.0 - last.0) + (now.1 - last.1) <= 1);
                last = now;
            }
        }

        #[test]
        fn prop_entities_stay_on_pitch(
            seed in any::<u64>(),
            inputs in prop::collection::vec(intent_strategy(), 1..400),
        ) {
            let mut m = new_match(Difficulty::Medium, seed);
            for input in &inputs {
                tick(&mut m, input, SIM_DT);
                prop_assert!(m.field.contains(m.player.body.pos));
                prop_assert!(m.field.contains(m.keeper.body.pos));
                for d in &m.defenders {
                    prop_assert!(m.field.contains(d.body.pos));
                }
                let in_corridor = m.field.in_goal_mouth(m.ball.pos.y);
                prop_assert!(in_corridor || m.field.contains(m.ball.pos));
                prop_assert!(m.ball.vel.is_finite());
            }
        }
    }
}
